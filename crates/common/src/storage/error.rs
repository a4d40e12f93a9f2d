//! Storage error types

use thiserror::Error;

/// Storage error type
///
/// `RecordNotFound` and `RecordAlreadyExists` are part of the engine
/// contract; callers branch on them. Everything else is a generic failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record \"{key}\" not found in table \"{table}\"")]
    RecordNotFound { table: String, key: String },

    #[error("Record \"{key}\" already exists in table \"{table}\"")]
    RecordAlreadyExists { table: String, key: String },

    #[error("Invalid record identifier: {0}")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub fn not_found(table: &str, key: &str) -> Self {
        Self::RecordNotFound { table: table.to_string(), key: key.to_string() }
    }

    pub fn already_exists(table: &str, key: &str) -> Self {
        Self::RecordAlreadyExists { table: table.to_string(), key: key.to_string() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::RecordAlreadyExists { .. })
    }
}
