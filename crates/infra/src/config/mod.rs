//! Configuration loading
//!
//! Client configuration comes from environment variables or from a JSON or
//! TOML file.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, find_config_path};
