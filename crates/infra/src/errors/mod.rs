//! Conversions between infrastructure and domain errors

pub mod conversions;

pub use conversions::is_network_failure;
