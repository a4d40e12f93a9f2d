//! # AuthWire Core
//!
//! Session logic without transport code.
//!
//! This crate contains:
//! - The renewal-cookie persistence port and its storage-backed adapter
//! - Session state (current token, connectivity) with change notification
//! - The pure error classifier used by the dispatcher
//!
//! ## Architecture Principles
//! - Depends on `authwire-common` and `authwire-domain` only
//! - No HTTP client code; transport outcomes arrive as plain data
//! - Storage reached through the `StoreEngine` capability

pub mod classifier;
pub mod credentials;
pub mod session;

pub use classifier::{classify, ErrorClass, TransportFailure};
pub use credentials::ports::CookieStore;
pub use credentials::CredentialStore;
pub use session::SessionState;
