//! Authenticated API client
//!
//! Every request is admitted through a bounded [`RequestQueue`], carries the
//! current access token, and is classified on failure. A request rejected
//! with `403 invalid-credentials` renews the session once (shared between
//! all concurrent callers) and is re-admitted through the queue exactly one
//! more time.

use std::fmt;
use std::sync::Arc;

use authwire_common::storage::{FileEngine, MemoryEngine, StoreEngine};
use authwire_common::sync::{QueueConfig, QueueMetricsSnapshot, RequestQueue, SingleFlight};
use authwire_core::classifier::{classify, is_refresh_trigger, ErrorClass, TransportFailure};
use authwire_core::{CookieStore, CredentialStore, SessionState};
use authwire_domain::constants::{ACCESS_PATH, ACCESS_TOKEN_QUERY_PARAM};
use authwire_domain::{AccessToken, BackendError, ClientConfig, ConnectionState, ContentType};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};
use url::Url;

use super::auth::{AccessTokenProvider, TokenRefresher};
use super::errors::ApiError;
use crate::http::{ApiRequest, ApiResponse, HttpClient, HttpClientBuilder};

/// Which attempt of a request is being dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    /// The one retry after a session renewal
    Retry,
}

/// Result of a single dispatch
enum Dispatch {
    Complete(ApiResponse),
    /// Rejected with `403 invalid-credentials` while `rejected` was attached
    RefreshRequired { rejected: AccessToken, error: BackendError },
}

/// API client with queued dispatch and single-flight session renewal
///
/// Cloning is cheap; clones share the queue, session and credentials.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: String,
    http: HttpClient,
    queue: RequestQueue,
    session: Arc<SessionState>,
    cookies: Arc<dyn CookieStore>,
    tokens: Arc<dyn AccessTokenProvider>,
    refresh: SingleFlight<AccessToken, ApiError>,
}

impl ApiClient {
    /// Create a client with a file-backed credential store when
    /// `config.store_path` is set, an in-memory one otherwise
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// created
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::builder().config(config).build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Join `path` onto the configured base URL
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` if the result is not a valid URL.
    pub fn create_url(&self, path: &str) -> Result<Url, ApiError> {
        join_url(&self.inner.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.inner.session
    }

    /// Store holding the renewal cookie
    pub fn cookie_store(&self) -> &Arc<dyn CookieStore> {
        &self.inner.cookies
    }

    /// Install a token obtained out of band (e.g. after login)
    pub fn set_access_token(&self, token: AccessToken) {
        self.inner.session.replace_access_token(token);
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.inner.session.access_token()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.session.connection_state()
    }

    /// Receive every future connectivity transition
    pub fn subscribe_connection_state(&self) -> broadcast::Receiver<ConnectionState> {
        self.inner.session.subscribe()
    }

    pub fn queue_metrics(&self) -> QueueMetricsSnapshot {
        self.inner.queue.metrics()
    }

    /// Send a request through the queue
    ///
    /// With `token_as_param` the access token travels as the
    /// `access_token` query parameter instead of the `Authorization` header.
    ///
    /// # Errors
    ///
    /// `Network` when the backend is unreachable, `Backend` for structured
    /// rejections, `SessionTerminated` when renewal failed, `Status` or
    /// `Transport` for anything unclassified.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send_request(
        &self,
        request: ApiRequest,
        token_as_param: bool,
    ) -> Result<ApiResponse, ApiError> {
        self.send(request, token_as_param, Attempt::First).await
    }

    /// Send with `Content-Type: application/json`
    pub async fn send_json(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.send_request(request.content_type(ContentType::Json), false).await
    }

    /// Send with `Content-Type: application/x-protobuf`
    pub async fn send_protocol_buffer(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.send_request(request.content_type(ContentType::ProtocolBuffer), false).await
    }

    /// Dispatch `request` starting at `attempt`
    ///
    /// A first attempt rejected for invalid credentials renews the session
    /// and is retried once; a retry is never renewed again.
    pub async fn send(
        &self,
        request: ApiRequest,
        token_as_param: bool,
        attempt: Attempt,
    ) -> Result<ApiResponse, ApiError> {
        let mut attempt = attempt;
        loop {
            let outcome = self
                .inner
                .queue
                .submit(request.priority, || self.inner.dispatch(&request, token_as_param))
                .await?;

            match outcome {
                Dispatch::Complete(response) => return Ok(response),
                Dispatch::RefreshRequired { error, .. } if attempt == Attempt::Retry => {
                    warn!(path = %request.path, "Request rejected again after session renewal");
                    return Err(ApiError::Backend(error));
                }
                Dispatch::RefreshRequired { rejected, .. } => {
                    self.renew_if_current(&rejected).await?;
                    attempt = Attempt::Retry;
                }
            }
        }
    }

    /// Renew the session; concurrent callers share one renewal
    ///
    /// # Errors
    /// `ApiError::SessionTerminated` when the backend refuses the renewal.
    pub async fn refresh_access_token(&self) -> Result<AccessToken, ApiError> {
        let tokens = Arc::clone(&self.inner.tokens);
        self.inner
            .refresh
            .run(move || async move { tokens.refresh_access_token().await })
            .await
    }

    /// Issue the renewal request directly, bypassing the queue and the
    /// single-flight slot
    pub async fn post_access(&self, stale: Option<&AccessToken>) -> Result<ApiResponse, ApiError> {
        let refresher = TokenRefresher::new(
            self.inner.http.clone(),
            self.create_url(ACCESS_PATH)?,
            Arc::clone(&self.inner.session),
            Arc::clone(&self.inner.cookies),
        );
        refresher.post_access(stale).await
    }

    async fn renew_if_current(&self, rejected: &AccessToken) -> Result<(), ApiError> {
        if !self.inner.session.is_current(Some(rejected)) {
            debug!("Token already renewed by a concurrent request, retrying");
            return Ok(());
        }

        let session = Arc::clone(&self.inner.session);
        let tokens = Arc::clone(&self.inner.tokens);
        let rejected = rejected.clone();
        self.inner
            .refresh
            .run(move || renew_unless_replaced(session, tokens, rejected))
            .await?;
        Ok(())
    }
}

/// Refresh unless `rejected` was replaced before this flight started
///
/// Checked again inside the flight: a renewal that finished between the
/// caller's check and the flight's start has already installed a new token.
async fn renew_unless_replaced(
    session: Arc<SessionState>,
    tokens: Arc<dyn AccessTokenProvider>,
    rejected: AccessToken,
) -> Result<AccessToken, ApiError> {
    if session.is_current(Some(&rejected)) {
        return tokens.refresh_access_token().await;
    }
    debug!("Token replaced before renewal started, skipping refresh");
    session.access_token().ok_or_else(|| {
        ApiError::SessionTerminated("Session ended by a concurrent renewal".to_string())
    })
}

impl ClientInner {
    async fn dispatch(
        &self,
        request: &ApiRequest,
        token_as_param: bool,
    ) -> Result<Dispatch, ApiError> {
        let token = self.session.access_token().filter(|token| !token.is_empty());

        let mut url = join_url(&self.base_url, &request.path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        if token_as_param {
            if let Some(token) = &token {
                url.query_pairs_mut().append_pair(ACCESS_TOKEN_QUERY_PARAM, &token.access_token);
            }
        }

        let mut builder = self.http.request(request.method.clone(), url.clone());
        for (name, value) in &request.headers {
            if request.content_type.is_some() && name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
                continue;
            }
            let name = HeaderName::try_from(name.as_str())
                .map_err(|err| ApiError::InvalidRequest(format!("header {name}: {err}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|err| ApiError::InvalidRequest(format!("header {name}: {err}")))?;
            builder = builder.header(name, value);
        }
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type.as_str());
        }
        if !token_as_param {
            if let Some(token) = &token {
                builder = builder.header(AUTHORIZATION, token.authorization());
            }
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = match self.http.send(builder).await {
            Ok(response) => response,
            Err(err @ ApiError::Network { .. }) => {
                warn!(error = %err, "Backend unreachable");
                self.session.set_connection_state(ConnectionState::Disconnected);
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        if response.is_success() {
            self.session.set_connection_state(ConnectionState::Connected);
            return Ok(Dispatch::Complete(response));
        }

        let status = response.status.as_u16();
        warn!(status, url = %response.url, body = %response.text(), "HTTP request failed");

        match classify(&TransportFailure::Status { status, body: &response.body }) {
            ErrorClass::Backend(error) => match token {
                Some(rejected) if is_refresh_trigger(status, &error) => {
                    Ok(Dispatch::RefreshRequired { rejected, error })
                }
                _ => Err(ApiError::Backend(error)),
            },
            ErrorClass::Network { method, url } => Err(ApiError::Network { method, url }),
            ErrorClass::Raw => Err(ApiError::Status { status, url: response.url.clone(), body: response.text() }),
        }
    }
}

fn join_url(base: &str, path: &str) -> Result<Url, ApiError> {
    let base = base.trim_end_matches('/');
    let joined = if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };
    Url::parse(&joined).map_err(|err| ApiError::InvalidRequest(format!("{joined}: {err}")))
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("queue", &self.inner.queue)
            .field("connection_state", &self.connection_state())
            .finish()
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ClientConfig>,
    engine: Option<Arc<dyn StoreEngine>>,
    cookies: Option<Arc<dyn CookieStore>>,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
    session: Option<Arc<SessionState>>,
    http: Option<HttpClient>,
}

impl ApiClientBuilder {
    /// Set the client configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Storage engine for the renewal cookie
    pub fn store_engine(mut self, engine: Arc<dyn StoreEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Replace the storage-backed cookie store entirely
    pub fn cookie_store(mut self, cookies: Arc<dyn CookieStore>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    /// Replace the access-endpoint refresher
    pub fn token_provider(mut self, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Share session state with another component
    pub fn session(mut self, session: Arc<SessionState>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if configuration is missing or invalid
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config =
            self.config.ok_or_else(|| ApiError::Config("Client config not set".to_string()))?;
        join_url(&config.base_url, "/")
            .map_err(|err| ApiError::Config(format!("Invalid base URL: {err}")))?;

        let http = match self.http {
            Some(http) => http,
            None => HttpClientBuilder::from_config(&config).build()?,
        };

        let queue = RequestQueue::with_config(QueueConfig::new(config.max_concurrent_requests))
            .map_err(|err| ApiError::Config(err.to_string()))?;

        let session = self.session.unwrap_or_default();

        let cookies: Arc<dyn CookieStore> = match self.cookies {
            Some(cookies) => cookies,
            None => {
                let engine: Arc<dyn StoreEngine> = match (self.engine, &config.store_path) {
                    (Some(engine), _) => engine,
                    (None, Some(root)) => Arc::new(FileEngine::new(root.clone())),
                    (None, None) => Arc::new(MemoryEngine::new()),
                };
                Arc::new(CredentialStore::new(engine))
            }
        };

        let tokens: Arc<dyn AccessTokenProvider> = match self.tokens {
            Some(tokens) => tokens,
            None => Arc::new(TokenRefresher::new(
                http.clone(),
                join_url(&config.base_url, ACCESS_PATH)?,
                Arc::clone(&session),
                Arc::clone(&cookies),
            )),
        };

        debug!(
            base_url = %config.base_url,
            max_concurrent = config.max_concurrent_requests,
            "API client ready"
        );

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                base_url: config.base_url,
                http,
                queue,
                session,
                tokens,
                cookies,
                refresh: SingleFlight::new(),
            }),
        })
    }
}
