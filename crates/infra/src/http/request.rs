//! Outbound request descriptor

use std::collections::BTreeMap;

use authwire_common::sync::Priority;
use authwire_domain::ContentType;
use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;

use crate::api::errors::ApiError;

/// Transport-independent description of one API call
///
/// Cheap to clone; a retry re-sends the same descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL (e.g. "/self")
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Bytes>,
    pub content_type: Option<ContentType>,
    /// Admission priority in the request queue
    pub priority: Priority,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            query: Vec::new(),
            body: None,
            content_type: None,
            priority: Priority::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body
    ///
    /// # Errors
    /// Returns `ApiError::Serialization` if `value` cannot be encoded.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ApiError> {
        self.body = Some(Bytes::from(serde_json::to_vec(value)?));
        self.content_type = Some(ContentType::Json);
        Ok(self)
    }

    /// Use an already encoded protocol-buffer message as the body
    pub fn protobuf(mut self, encoded: impl Into<Bytes>) -> Self {
        self.body = Some(encoded.into());
        self.content_type = Some(ContentType::ProtocolBuffer);
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_body_sets_content_type() {
        let request = ApiRequest::post("/conversations").json(&json!({ "name": "ops" })).unwrap();

        assert_eq!(request.content_type, Some(ContentType::Json));
        assert_eq!(request.body.as_deref(), Some(br#"{"name":"ops"}"#.as_slice()));
    }

    #[test]
    fn test_builder_accumulates_headers_and_query() {
        let request = ApiRequest::get("/assets")
            .header("X-Trace", "1")
            .query("size", "10")
            .query("start", "abc")
            .priority(Priority::Low);

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.headers.get("X-Trace").map(String::as_str), Some("1"));
        assert_eq!(request.query.len(), 2);
        assert_eq!(request.priority, Priority::Low);
    }
}
