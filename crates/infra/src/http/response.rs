//! Buffered response

use bytes::Bytes;
use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::api::errors::ApiError;

/// Fully read HTTP response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Final URL after redirects
    pub url: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON
    ///
    /// Empty bodies (204/205) decode as JSON `null`, so `()` and `Option<T>`
    /// targets succeed.
    ///
    /// # Errors
    /// Returns `ApiError::Serialization` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.body.is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as UTF-8 text, lossy
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Raw `Set-Cookie` header values, in order
    pub fn set_cookie_headers(&self) -> Vec<&str> {
        self.headers.get_all(SET_COOKIE).iter().filter_map(|value| value.to_str().ok()).collect()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use serde::Deserialize;

    use super::*;

    fn response(body: &'static [u8]) -> ApiResponse {
        ApiResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body),
            url: "https://api.example.com/self".to_string(),
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct SelfUser {
        id: String,
    }

    #[test]
    fn test_json_decoding() {
        let user: SelfUser = response(br#"{"id":"u-1"}"#).json().unwrap();
        assert_eq!(user, SelfUser { id: "u-1".into() });

        assert!(response(b"").json::<()>().is_ok());
        assert!(matches!(
            response(b"not json").json::<SelfUser>(),
            Err(ApiError::Serialization(_))
        ));
    }

    #[test]
    fn test_set_cookie_headers_keep_all_values() {
        let mut resp = response(b"");
        resp.headers.append(SET_COOKIE, HeaderValue::from_static("zuid=a; Path=/access"));
        resp.headers.append(SET_COOKIE, HeaderValue::from_static("other=b"));

        assert_eq!(resp.set_cookie_headers(), vec!["zuid=a; Path=/access", "other=b"]);
    }
}
