//! API-specific error types
//!
//! Every failure of the dispatcher surfaces as one [`ApiError`]. Errors are
//! `Clone` so a single refresh outcome can be handed to every waiting
//! request.

use authwire_domain::{BackendError, BackendErrorLabel};
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Backend unreachable
    Network,
    /// Structured rejection from the backend
    Backend,
    /// Session cannot be renewed, re-authentication required
    Session,
    /// Unclassified transport or status failure
    Transport,
    /// Local failures (storage, configuration, encoding)
    Local,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Cannot do \"{method}\" request to \"{url}\"")]
    Network { method: String, url: String },

    #[error("Backend error: {0}")]
    Backend(BackendError),

    #[error("Session terminated: {0}")]
    SessionTerminated(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String, body: String },

    #[error("Response body exceeds {limit} bytes")]
    OversizedResponse { limit: u64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Network { .. } => ApiErrorCategory::Network,
            Self::Backend(_) => ApiErrorCategory::Backend,
            Self::SessionTerminated(_) => ApiErrorCategory::Session,
            Self::Transport(_) | Self::Status { .. } | Self::OversizedResponse { .. } => {
                ApiErrorCategory::Transport
            }
            Self::InvalidRequest(_)
            | Self::Storage(_)
            | Self::Config(_)
            | Self::Serialization(_) => ApiErrorCategory::Local,
        }
    }

    /// Typed label when the backend rejected the request
    pub fn backend_label(&self) -> Option<BackendErrorLabel> {
        match self {
            Self::Backend(error) => Some(error.kind()),
            _ => None,
        }
    }

    pub fn is_session_terminated(&self) -> bool {
        matches!(self, Self::SessionTerminated(_))
    }
}

impl From<BackendError> for ApiError {
    fn from(error: BackendError) -> Self {
        Self::Backend(error)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::Network { method: "GET".into(), url: "https://x/y".into() }.category(),
            ApiErrorCategory::Network
        );
        assert_eq!(
            ApiError::Backend(BackendError::new(404, "not-found", "nope")).category(),
            ApiErrorCategory::Backend
        );
        assert_eq!(ApiError::SessionTerminated("gone".into()).category(), ApiErrorCategory::Session);
        assert_eq!(ApiError::OversizedResponse { limit: 1 }.category(), ApiErrorCategory::Transport);
        assert_eq!(ApiError::Storage("disk".into()).category(), ApiErrorCategory::Local);
    }

    #[test]
    fn test_network_message_names_method_and_url() {
        let err = ApiError::Network { method: "POST".into(), url: "https://api/x".into() };
        assert_eq!(err.to_string(), "Cannot do \"POST\" request to \"https://api/x\"");
    }

    #[test]
    fn test_backend_label() {
        let err = ApiError::from(BackendError::new(403, "suspended", "account suspended"));
        assert_eq!(err.backend_label(), Some(BackendErrorLabel::Suspended));
        assert_eq!(ApiError::Transport("x".into()).backend_label(), None);
    }
}
