//! Structured backend errors
//!
//! A failing response body only counts as a backend error when it carries all
//! of `code`, `label` and `message`. Anything else stays an opaque transport
//! failure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::LABEL_INVALID_CREDENTIALS;

/// Error triple decoded from a failing response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendError {
    pub code: i64,
    pub label: String,
    pub message: String,
}

impl BackendError {
    pub fn new(code: i64, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code, label: label.into(), message: message.into() }
    }

    /// Typed view of the label
    pub fn kind(&self) -> BackendErrorLabel {
        BackendErrorLabel::from(self.label.as_str())
    }

    pub fn is_invalid_credentials(&self) -> bool {
        self.label == LABEL_INVALID_CREDENTIALS
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.label, self.code, self.message)
    }
}

/// Known backend error labels
///
/// Labels the client does not know about are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BackendErrorLabel {
    AccessDenied,
    BadRequest,
    ClientNotFound,
    InvalidCredentials,
    InvalidOperation,
    KeyExists,
    MissingAuth,
    NotFound,
    PendingActivation,
    ServerError,
    Suspended,
    TooManyClients,
    UnknownClient,
    Other(String),
}

impl BackendErrorLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AccessDenied => "access-denied",
            Self::BadRequest => "bad-request",
            Self::ClientNotFound => "client-not-found",
            Self::InvalidCredentials => LABEL_INVALID_CREDENTIALS,
            Self::InvalidOperation => "invalid-operation",
            Self::KeyExists => "key-exists",
            Self::MissingAuth => "missing-auth",
            Self::NotFound => "not-found",
            Self::PendingActivation => "pending-activation",
            Self::ServerError => "server-error",
            Self::Suspended => "suspended",
            Self::TooManyClients => "too-many-clients",
            Self::UnknownClient => "unknown-client",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for BackendErrorLabel {
    fn from(label: &str) -> Self {
        match label {
            "access-denied" => Self::AccessDenied,
            "bad-request" => Self::BadRequest,
            "client-not-found" => Self::ClientNotFound,
            LABEL_INVALID_CREDENTIALS => Self::InvalidCredentials,
            "invalid-operation" => Self::InvalidOperation,
            "key-exists" => Self::KeyExists,
            "missing-auth" => Self::MissingAuth,
            "not-found" => Self::NotFound,
            "pending-activation" => Self::PendingActivation,
            "server-error" => Self::ServerError,
            "suspended" => Self::Suspended,
            "too-many-clients" => Self::TooManyClients,
            "unknown-client" => Self::UnknownClient,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BackendErrorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
