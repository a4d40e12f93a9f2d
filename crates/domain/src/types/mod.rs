//! Domain types and models

pub mod backend;
pub mod connection;
pub mod content;
pub mod token;

pub use backend::{BackendError, BackendErrorLabel};
pub use connection::ConnectionState;
pub use content::ContentType;
pub use token::{AccessToken, RenewalCookie};
