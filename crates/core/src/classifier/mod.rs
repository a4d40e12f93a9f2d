//! Transport failure classification
//!
//! Pure functions, no I/O. The dispatcher describes what went wrong as a
//! [`TransportFailure`] and acts on the returned [`ErrorClass`].

use authwire_domain::BackendError;
use serde::Deserialize;

/// HTTP status that, combined with `invalid-credentials`, asks for a refresh
pub const STATUS_FORBIDDEN: u16 = 403;

/// What the transport observed when a request did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure<'a> {
    /// No response arrived
    NoResponse {
        method: &'a str,
        url: &'a str,
        /// Whether the request reached the wire before failing
        dispatched: bool,
    },
    /// A response arrived with a non-success status
    Status { status: u16, body: &'a [u8] },
}

/// Outcome of classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    /// Nothing left the client; the backend is unreachable
    Network { method: String, url: String },
    /// Structured rejection decoded from the body
    Backend(BackendError),
    /// Anything else, surfaced unchanged
    Raw,
}

/// Strict wire form: every field required and well-typed.
#[derive(Deserialize)]
struct BackendErrorBody {
    code: i64,
    label: String,
    message: String,
}

/// Classify a failed transport outcome
pub fn classify(failure: &TransportFailure<'_>) -> ErrorClass {
    match *failure {
        TransportFailure::NoResponse { method, url, dispatched: false } => {
            ErrorClass::Network { method: method.to_string(), url: url.to_string() }
        }
        TransportFailure::NoResponse { dispatched: true, .. } => ErrorClass::Raw,
        TransportFailure::Status { body, .. } => {
            decode_backend_error(body).map_or(ErrorClass::Raw, ErrorClass::Backend)
        }
    }
}

/// Decode `{code, label, message}`; partial or mistyped bodies yield `None`
pub fn decode_backend_error(body: &[u8]) -> Option<BackendError> {
    serde_json::from_slice::<BackendErrorBody>(body)
        .ok()
        .map(|wire| BackendError::new(wire.code, wire.label, wire.message))
}

/// Whether a rejection should trigger the refresh-and-retry path
pub fn is_refresh_trigger(status: u16, error: &BackendError) -> bool {
    status == STATUS_FORBIDDEN && error.is_invalid_credentials()
}

#[cfg(test)]
mod tests {
    use authwire_domain::BackendErrorLabel;

    use super::*;

    #[test]
    fn test_undispatched_failure_is_network() {
        let failure = TransportFailure::NoResponse {
            method: "GET",
            url: "https://api.example.com/self",
            dispatched: false,
        };

        assert_eq!(
            classify(&failure),
            ErrorClass::Network {
                method: "GET".to_string(),
                url: "https://api.example.com/self".to_string(),
            }
        );
    }

    #[test]
    fn test_dispatched_failure_without_response_is_raw() {
        let failure =
            TransportFailure::NoResponse { method: "POST", url: "https://x/y", dispatched: true };
        assert_eq!(classify(&failure), ErrorClass::Raw);
    }

    #[test]
    fn test_complete_body_is_backend_error() {
        let body = br#"{"code":403,"label":"invalid-credentials","message":"Invalid token"}"#;
        let class = classify(&TransportFailure::Status { status: 403, body });

        let ErrorClass::Backend(error) = class else { panic!("expected backend error") };
        assert_eq!(error.code, 403);
        assert_eq!(error.label, "invalid-credentials");
        assert_eq!(error.message, "Invalid token");
        assert_eq!(error.kind(), BackendErrorLabel::InvalidCredentials);
        assert!(is_refresh_trigger(403, &error));
    }

    #[test]
    fn test_code_outside_http_range_is_still_backend_error() {
        let body = br#"{"code":100000,"label":"quota-exceeded","message":"over quota"}"#;
        let class = classify(&TransportFailure::Status { status: 429, body });

        let ErrorClass::Backend(error) = class else { panic!("expected backend error") };
        assert_eq!(error.code, 100_000);

        let negative = br#"{"code":-1,"label":"unknown","message":"?"}"#;
        assert!(matches!(
            classify(&TransportFailure::Status { status: 500, body: negative }),
            ErrorClass::Backend(_)
        ));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let body = br#"{"code":404,"label":"not-found","message":"gone","data":{"id":1}}"#;
        assert!(matches!(
            classify(&TransportFailure::Status { status: 404, body }),
            ErrorClass::Backend(_)
        ));
    }

    #[test]
    fn test_partial_or_mistyped_bodies_are_raw() {
        let bodies: [&[u8]; 6] = [
            br#"{"code":403,"label":"invalid-credentials"}"#,
            br#"{"label":"x","message":"y"}"#,
            br#"{"code":"403","label":"x","message":"y"}"#,
            br#"{"code":403,"label":7,"message":"y"}"#,
            b"<html>Bad Gateway</html>",
            b"",
        ];

        for body in bodies {
            assert_eq!(
                classify(&TransportFailure::Status { status: 502, body }),
                ErrorClass::Raw,
                "body {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_refresh_trigger_needs_forbidden_and_label() {
        let invalid = BackendError::new(403, "invalid-credentials", "expired");
        let denied = BackendError::new(403, "access-denied", "no");

        assert!(is_refresh_trigger(STATUS_FORBIDDEN, &invalid));
        assert!(!is_refresh_trigger(401, &invalid));
        assert!(!is_refresh_trigger(STATUS_FORBIDDEN, &denied));
    }
}
