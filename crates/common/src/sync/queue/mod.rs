//! Request admission queue
//!
//! A single admission point for outbound work. At most
//! `QueueConfig::max_concurrent` units run at once; the rest wait and are
//! admitted by priority, then in submission order.

pub mod core;
pub mod errors;
pub mod metrics;
pub mod types;

pub use self::core::RequestQueue;
pub use errors::{QueueError, QueueResult};
pub use metrics::{QueueMetrics, QueueMetricsSnapshot};
pub use types::{Priority, QueueConfig};
