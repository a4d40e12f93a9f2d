//! Runtime building blocks shared across AuthWire crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: storage contract, storage errors, in-memory engine
//! - `runtime`: async infrastructure (file engine, request queue,
//!   single-flight)
//! - `observability`: tracing (implied by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod storage;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod sync;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use storage::{MemoryEngine, StorageError, StorageResult, StoreEngine};
#[cfg(feature = "runtime")]
pub use storage::FileEngine;
#[cfg(feature = "runtime")]
pub use sync::{FlightPanicked, Priority, QueueConfig, RequestQueue, SingleFlight};
