use thiserror::Error;

/// Queue operation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Invalid queue configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
