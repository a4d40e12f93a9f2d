//! # AuthWire Domain
//!
//! Domain types shared by every AuthWire crate.
//!
//! This crate contains:
//! - Credential types (`AccessToken`, `RenewalCookie`)
//! - Connectivity state and structured backend errors
//! - Client configuration structures
//! - Domain error types and Result definitions
//! - Protocol constants
//!
//! ## Architecture
//! - No dependencies on other AuthWire crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
