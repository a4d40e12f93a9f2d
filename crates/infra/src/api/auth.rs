//! Access-token renewal
//!
//! The renewal handshake posts the stale access token together with the
//! long-lived renewal cookie to the access endpoint. A new token comes back
//! in the body and, usually, a rotated renewal cookie in `Set-Cookie`.
//!
//! Any failure of the handshake terminates the session: the caller has to
//! authenticate again from scratch.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use authwire_core::{CookieStore, SessionState};
use authwire_domain::constants::RENEWAL_COOKIE_NAME;
use authwire_domain::AccessToken;
use reqwest::header::{AUTHORIZATION, COOKIE};
use reqwest::Method;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::cookie::renewal_cookie_from_headers;
use super::errors::ApiError;
use crate::http::{ApiResponse, HttpClient};

/// Source of fresh access tokens
///
/// The dispatcher calls this when the backend rejects the current token.
/// Implementations install the new token into the session themselves.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Obtain and install a new access token
    ///
    /// # Errors
    /// `ApiError::SessionTerminated` when the session cannot be renewed.
    async fn refresh_access_token(&self) -> Result<AccessToken, ApiError>;
}

/// Renews the session against the access endpoint
pub struct TokenRefresher {
    http: HttpClient,
    access_url: Url,
    session: Arc<SessionState>,
    cookies: Arc<dyn CookieStore>,
}

impl TokenRefresher {
    pub fn new(
        http: HttpClient,
        access_url: Url,
        session: Arc<SessionState>,
        cookies: Arc<dyn CookieStore>,
    ) -> Self {
        Self { http, access_url, session, cookies }
    }

    pub fn access_url(&self) -> &Url {
        &self.access_url
    }

    /// Issue the raw renewal request
    ///
    /// The stale token travels URL-decoded in `Authorization`; the renewal
    /// cookie is attached only while it is still valid.
    ///
    /// # Errors
    /// Transport failures, cookie-store failures and non-success statuses.
    pub async fn post_access(&self, stale: Option<&AccessToken>) -> Result<ApiResponse, ApiError> {
        let mut builder = self.http.request(Method::POST, self.access_url.clone());

        if let Some(token) = stale.filter(|token| !token.is_empty()) {
            let decoded = urlencoding::decode(&token.access_token)
                .map(|value| value.into_owned())
                .unwrap_or_else(|_| token.access_token.clone());
            builder = builder.header(AUTHORIZATION, format!("{} {}", token.token_type, decoded));
        }

        let cookie = self.cookies.load().await?;
        if cookie.is_expired() {
            debug!("No valid renewal cookie, refreshing with access token only");
        } else {
            builder = builder.header(COOKIE, format!("{RENEWAL_COOKIE_NAME}={}", cookie.value));
        }

        let response = self.http.send(builder).await?;
        if !response.is_success() {
            warn!(
                status = response.status.as_u16(),
                url = %response.url,
                body = %response.text(),
                "Access request rejected"
            );
            return Err(ApiError::Status {
                status: response.status.as_u16(),
                url: response.url.clone(),
                body: response.text(),
            });
        }
        Ok(response)
    }

    async fn renew(&self) -> Result<AccessToken, ApiError> {
        let stale = self.session.access_token();

        let response = self.post_access(stale.as_ref()).await.map_err(|err| self.terminate(&err))?;
        let token: AccessToken = response.json().map_err(|err| self.terminate(&err))?;

        match renewal_cookie_from_headers(response.set_cookie_headers()) {
            Some(cookie) => self.cookies.save(&cookie).await?,
            None => debug!("Access response carried no renewal cookie"),
        }

        self.session.replace_access_token(token.clone());
        info!(token_type = %token.token_type, expires_in = token.expires_in, "Access token renewed");
        Ok(token)
    }

    fn terminate(&self, cause: &ApiError) -> ApiError {
        warn!(error = %cause, "Session renewal failed, logging out");
        self.session.clear_access_token();
        ApiError::SessionTerminated(format!("Got logged out from backend: {cause}"))
    }
}

#[async_trait]
impl AccessTokenProvider for TokenRefresher {
    #[instrument(skip(self))]
    async fn refresh_access_token(&self) -> Result<AccessToken, ApiError> {
        self.renew().await
    }
}

impl fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRefresher").field("access_url", &self.access_url).finish()
    }
}
