use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{QueueError, QueueResult};

/// Admission priority
///
/// Lower discriminant means admitted earlier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical = 0,
    High = 1,
    #[default]
    Normal = 2,
    Low = 3,
    Background = 4,
}

impl From<u8> for Priority {
    fn from(value: u8) -> Self {
        match value {
            0 => Priority::Critical,
            1 => Priority::High,
            2 => Priority::Normal,
            3 => Priority::Low,
            _ => Priority::Background,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Critical => write!(f, "Critical"),
            Priority::High => write!(f, "High"),
            Priority::Normal => write!(f, "Normal"),
            Priority::Low => write!(f, "Low"),
            Priority::Background => write!(f, "Background"),
        }
    }
}

/// Configuration for [`RequestQueue`](super::RequestQueue)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of units running at the same time
    pub max_concurrent: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

impl QueueConfig {
    pub fn new(max_concurrent: usize) -> Self {
        Self { max_concurrent }
    }

    /// Validate the configuration
    pub fn validate(&self) -> QueueResult<()> {
        if self.max_concurrent == 0 {
            return Err(QueueError::InvalidConfig(
                "max_concurrent must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
