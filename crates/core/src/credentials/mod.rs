//! Renewal-cookie persistence
//!
//! The dispatcher only sees the [`CookieStore`](ports::CookieStore) port;
//! [`CredentialStore`] implements it on top of any `StoreEngine`.

pub mod ports;
pub mod store;

pub use ports::CookieStore;
pub use store::CredentialStore;
