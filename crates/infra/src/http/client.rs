use std::time::Duration;

use authwire_core::classifier::{classify, ErrorClass, TransportFailure};
use authwire_domain::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use authwire_domain::ClientConfig;
use bytes::{Bytes, BytesMut};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use super::response::ApiResponse;
use crate::api::errors::ApiError;
use crate::errors::is_network_failure;

/// HTTP client with a response payload cap.
///
/// Bodies are streamed and rejected as soon as they exceed
/// `max_content_length`, never buffered past it.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_content_length: u64,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, ApiError> {
        Self::builder().build()
    }

    pub fn max_content_length(&self) -> u64 {
        self.max_content_length
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request and buffer the response body.
    ///
    /// Non-success statuses are returned as responses; only transport
    /// failures are errors. A failure before the request left the client is
    /// `ApiError::Network`.
    pub async fn send(&self, builder: RequestBuilder) -> Result<ApiResponse, ApiError> {
        let request = builder.build().map_err(|err| ApiError::InvalidRequest(err.to_string()))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                let failure = TransportFailure::NoResponse {
                    method: method.as_str(),
                    url: url.as_str(),
                    dispatched: !is_network_failure(&err),
                };
                return Err(match classify(&failure) {
                    ErrorClass::Network { method, url } => ApiError::Network { method, url },
                    _ => ApiError::Transport(err.to_string()),
                });
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();
        debug!(%method, %url, %status, "received HTTP response");

        let body = read_capped(response, self.max_content_length).await?;
        Ok(ApiResponse { status, headers, body, url: final_url })
    }
}

async fn read_capped(mut response: Response, limit: u64) -> Result<Bytes, ApiError> {
    if response.content_length().is_some_and(|declared| declared > limit) {
        return Err(ApiError::OversizedResponse { limit });
    }

    let mut body = BytesMut::new();
    while let Some(chunk) =
        response.chunk().await.map_err(|err| ApiError::Transport(err.to_string()))?
    {
        if (body.len() + chunk.len()) as u64 > limit {
            return Err(ApiError::OversizedResponse { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    connect_timeout: Duration,
    timeout: Duration,
    max_content_length: u64,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    /// Transport settings taken from a client configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        let builder = Self::default()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .max_content_length(config.max_content_length);

        match &config.user_agent {
            Some(agent) => builder.user_agent(agent.clone()),
            None => builder,
        }
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Largest response body accepted, in bytes.
    pub fn max_content_length(mut self, limit: u64) -> Self {
        self.max_content_length = limit;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut builder = ReqwestClient::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client, max_content_length: self.max_content_length })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::StatusCode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn returns_non_success_status_as_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.text(), "missing");
    }

    #[tokio::test]
    async fn rejects_body_over_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/large"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 2048]))
            .mount(&server)
            .await;

        let client = HttpClient::builder().max_content_length(1024).build().unwrap();
        let result =
            client.send(client.request(Method::GET, format!("{}/large", server.uri()))).await;

        assert_eq!(result.unwrap_err(), ApiError::OversizedResponse { limit: 1024 });
    }

    #[tokio::test]
    async fn accepts_body_at_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 1024]))
            .mount(&server)
            .await;

        let client = HttpClient::builder().max_content_length(1024).build().unwrap();
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();
        assert_eq!(response.body.len(), 1024);
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let url = format!("http://{}/self", addr);

        let client = HttpClient::new().unwrap();
        let result = client.send(client.request(Method::DELETE, &url)).await;
        match result {
            Err(ApiError::Network { method, url: failed_url }) => {
                assert_eq!(method, "DELETE");
                assert_eq!(failed_url, url);
            }
            other => panic!("expected network error, got {:?}", other),
        }
    }
}
