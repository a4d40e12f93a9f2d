//! HTTP transport
//!
//! [`HttpClient`] wraps reqwest with a response-size cap and hands back fully
//! buffered [`ApiResponse`]s. Credential handling lives one layer up in the
//! API client.

pub mod client;
pub mod request;
pub mod response;

pub use client::{HttpClient, HttpClientBuilder};
pub use request::ApiRequest;
pub use response::ApiResponse;
