//! # AuthWire Infrastructure
//!
//! Transport-facing implementation of the AuthWire session.
//!
//! This crate contains:
//! - The capped HTTP client over `reqwest`
//! - The authenticated API client (queueing, token attachment, renewal)
//! - `Set-Cookie` parsing for the renewal cookie
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements the ports defined in `authwire-core`
//! - Depends on `authwire-common`, `authwire-domain` and `authwire-core`
//! - Contains all network I/O

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    AccessTokenProvider, ApiClient, ApiClientBuilder, ApiError, ApiErrorCategory, Attempt,
    TokenRefresher,
};
pub use http::{ApiRequest, ApiResponse, HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
