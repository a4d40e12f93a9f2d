use authwire_domain::{AccessToken, ClientConfig};
use authwire_infra::ApiClient;
use serde_json::json;
use wiremock::{MockServer, ResponseTemplate};

pub const STALE: &str = "stale-token";
pub const FRESH: &str = "fresh-token";

/// Backend rejection that triggers a session renewal.
pub fn invalid_credentials() -> ResponseTemplate {
    ResponseTemplate::new(403).set_body_json(json!({
        "code": 403,
        "label": "invalid-credentials",
        "message": "Invalid token"
    }))
}

/// Successful `/access` response carrying `value` as the new token.
pub fn access_granted(value: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "token_type": "Bearer",
        "access_token": value,
        "expires_in": 900,
        "user": "3bc5750a-b965-40f8-aff2-831e9b5ac2e9"
    }))
}

pub fn bearer(value: &str) -> String {
    format!("Bearer {value}")
}

/// Client against `server` holding the stale token.
pub fn client_with_stale_token(server: &MockServer) -> ApiClient {
    client_with_config(ClientConfig::new(server.uri()))
}

pub fn client_with_config(config: ClientConfig) -> ApiClient {
    let client = ApiClient::new(config).expect("client should build");
    client.set_access_token(AccessToken::new("Bearer", STALE, 900));
    client
}
