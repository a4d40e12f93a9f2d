//! Client configuration structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_MAX_CONTENT_LENGTH,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Configuration for the authenticated HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is appended to (e.g. "https://api.example.com")
    pub base_url: String,
    /// Upper bound on requests in flight at the same time
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
    /// Largest accepted response body in bytes
    #[serde(default = "default_max_content_length")]
    pub max_content_length: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Directory used by the file-backed credential store
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Configuration with defaults for everything except the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: None,
            store_path: None,
        }
    }
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

fn default_max_content_length() -> u64 {
    DEFAULT_MAX_CONTENT_LENGTH
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "https://api.example.com"}"#).unwrap();

        assert_eq!(config, ClientConfig::new("https://api.example.com"));
        assert_eq!(config.max_content_length, 104_857_600);
    }
}
