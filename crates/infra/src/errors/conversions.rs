//! Conversions from infrastructure errors into domain errors and back.

use authwire_common::sync::FlightPanicked;
use authwire_domain::AuthWireError;
use reqwest::Error as HttpError;

use crate::api::errors::ApiError;

/* -------------------------------------------------------------------------- */
/* ApiError → AuthWireError */
/* -------------------------------------------------------------------------- */

impl From<ApiError> for AuthWireError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Network { .. } => AuthWireError::Network(message),
            ApiError::Backend(_) => AuthWireError::Backend(message),
            ApiError::SessionTerminated(_) => AuthWireError::Auth(message),
            ApiError::Transport(_) | ApiError::Status { .. } | ApiError::OversizedResponse { .. } => {
                AuthWireError::Network(message)
            }
            ApiError::InvalidRequest(_) => AuthWireError::InvalidInput(message),
            ApiError::Storage(_) => AuthWireError::Storage(message),
            ApiError::Config(_) => AuthWireError::Config(message),
            ApiError::Serialization(_) => AuthWireError::Internal(message),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* AuthWireError → ApiError (port results) */
/* -------------------------------------------------------------------------- */

impl From<AuthWireError> for ApiError {
    fn from(err: AuthWireError) -> Self {
        match err {
            AuthWireError::Storage(message) => ApiError::Storage(message),
            AuthWireError::Config(message) => ApiError::Config(message),
            AuthWireError::InvalidInput(message) => ApiError::InvalidRequest(message),
            AuthWireError::Auth(message) => ApiError::SessionTerminated(message),
            AuthWireError::Network(message)
            | AuthWireError::Backend(message)
            | AuthWireError::Internal(message) => ApiError::Transport(message),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* FlightPanicked → ApiError (shared renewal) */
/* -------------------------------------------------------------------------- */

impl From<FlightPanicked> for ApiError {
    fn from(panicked: FlightPanicked) -> Self {
        ApiError::Transport(panicked.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error classification */
/* -------------------------------------------------------------------------- */

/// Whether `err` happened before the request reached the backend
///
/// Connection failures, timeouts and send failures leave no response behind;
/// anything else (redirect loops, body decoding) happened after the backend
/// was reached.
pub fn is_network_failure(err: &HttpError) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
