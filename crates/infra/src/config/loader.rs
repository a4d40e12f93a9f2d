//! Configuration loader
//!
//! Loads the client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `AUTHWIRE_BASE_URL` is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `AUTHWIRE_BASE_URL`: Backend base URL (required)
//! - `AUTHWIRE_MAX_CONCURRENT`: Requests in flight at the same time
//! - `AUTHWIRE_MAX_CONTENT_LENGTH`: Largest accepted response body in bytes
//! - `AUTHWIRE_CONNECT_TIMEOUT`: Connect timeout in seconds
//! - `AUTHWIRE_REQUEST_TIMEOUT`: Whole-request timeout in seconds
//! - `AUTHWIRE_USER_AGENT`: `User-Agent` header value
//! - `AUTHWIRE_STORE_PATH`: Directory of the file-backed credential store
//!
//! ## File Locations
//! The loader searches `config.{json,toml}` and `authwire.{json,toml}` in the
//! current working directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use authwire_domain::{AuthWireError, ClientConfig, Result};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `AuthWireError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `AUTHWIRE_BASE_URL` is required; unset optional variables keep their
/// defaults.
///
/// # Errors
/// Returns `AuthWireError::Config` if the base URL is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::new(env_var("AUTHWIRE_BASE_URL")?);

    if let Some(value) = env_parse("AUTHWIRE_MAX_CONCURRENT", "max concurrent requests")? {
        config.max_concurrent_requests = value;
    }
    if let Some(value) = env_parse("AUTHWIRE_MAX_CONTENT_LENGTH", "max content length")? {
        config.max_content_length = value;
    }
    if let Some(value) = env_parse("AUTHWIRE_CONNECT_TIMEOUT", "connect timeout")? {
        config.connect_timeout_secs = value;
    }
    if let Some(value) = env_parse("AUTHWIRE_REQUEST_TIMEOUT", "request timeout")? {
        config.request_timeout_secs = value;
    }
    config.user_agent = std::env::var("AUTHWIRE_USER_AGENT").ok();
    config.store_path = std::env::var("AUTHWIRE_STORE_PATH").ok().map(PathBuf::from);

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations (see
/// [`find_config_path`]). Format is detected by file extension.
///
/// # Errors
/// Returns `AuthWireError::Config` if no file is found, it cannot be read,
/// or its contents are invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AuthWireError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_path().ok_or_else(|| {
            AuthWireError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AuthWireError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path).and_then(validate)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AuthWireError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AuthWireError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(AuthWireError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn validate(config: ClientConfig) -> Result<ClientConfig> {
    url::Url::parse(&config.base_url)
        .map_err(|e| AuthWireError::Config(format!("Invalid base URL {}: {}", config.base_url, e)))?;
    if config.max_concurrent_requests == 0 {
        return Err(AuthWireError::Config(
            "max_concurrent_requests must be greater than 0".to_string(),
        ));
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_path() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("authwire.json"),
        dir.join("authwire.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        AuthWireError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional numeric environment variable
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AuthWireError::Config(format!("Invalid {}: {}", what, e))),
        Err(_) => Ok(None),
    }
}
