//! Coordination primitives for outbound request traffic
//!
//! ## Submodules
//!
//! - **`queue`**: priority admission queue bounding concurrent requests
//! - **`single_flight`**: shares one in-flight future between concurrent
//!   callers of the same operation

pub mod queue;
pub mod single_flight;

// Re-export commonly used types from queue
pub use queue::{
    Priority, QueueConfig, QueueError, QueueMetrics, QueueMetricsSnapshot, QueueResult,
    RequestQueue,
};
pub use single_flight::{FlightPanicked, SingleFlight};
