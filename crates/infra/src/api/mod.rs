//! Authenticated API client
//!
//! This module provides the request dispatcher and its session plumbing:
//! token attachment, failure classification, single-flight renewal against
//! the access endpoint and persistence of the rotated renewal cookie.
//!
//! # Architecture
//!
//! - All traffic goes through [`HttpClient`](crate::http::HttpClient)
//! - Admission is bounded by the shared request queue
//! - Renewal runs outside the queue so it can never wait on its own callers

pub mod auth;
pub mod client;
pub mod cookie;
pub mod errors;

pub use auth::{AccessTokenProvider, TokenRefresher};
pub use client::{ApiClient, ApiClientBuilder, Attempt};
pub use cookie::{renewal_cookie_from_headers, SetCookie};
pub use errors::{ApiError, ApiErrorCategory};
