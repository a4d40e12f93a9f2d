//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a client from it.

use std::io::Write;
use std::path::PathBuf;

use authwire_domain::AuthWireError;
use authwire_infra::{config, ApiClient};
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "base_url": "https://staging.example.com",
            "max_concurrent_requests": 6,
            "max_content_length": 1048576,
            "connect_timeout_secs": 5,
            "request_timeout_secs": 20,
            "user_agent": "authwire-it/0.1"
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.base_url, "https://staging.example.com");
    assert_eq!(config.max_concurrent_requests, 6);
    assert_eq!(config.max_content_length, 1_048_576);
    assert_eq!(config.connect_timeout_secs, 5);
    assert_eq!(config.request_timeout_secs, 20);
    assert_eq!(config.user_agent.as_deref(), Some("authwire-it/0.1"));

    let client = ApiClient::new(config).expect("client should build from loaded config");
    assert_eq!(client.base_url(), "https://staging.example.com");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let store = tempfile::tempdir().expect("temp dir");
    let contents = format!(
        "base_url = \"https://api.example.com\"\nstore_path = \"{}\"\n",
        store.path().display()
    );
    let path = write_config(&contents, "toml");

    let config = config::load_from_file(Some(path.clone())).expect("config should load");
    assert_eq!(config.store_path.as_deref(), Some(store.path()));
    assert!(ApiClient::new(config).is_ok());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_base_url_is_config_error() {
    let path = write_config(r#"{ "max_concurrent_requests": 2 }"#, "json");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(AuthWireError::Config(_))));

    std::fs::remove_file(path).ok();
}
