//! Credential types
//!
//! The access token is short-lived and travels with every request; the
//! renewal cookie is long-lived and only travels with refresh calls.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::LOGGED_COOKIE_PREFIX_LEN;

/// Bearer credential issued by the refresh endpoint
///
/// Replaced wholesale on every refresh, never mutated in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token_type: String,
    pub access_token: String,
    /// Lifetime hint in seconds as reported by the backend
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl AccessToken {
    pub fn new(
        token_type: impl Into<String>,
        access_token: impl Into<String>,
        expires_in: u64,
    ) -> Self {
        Self {
            token_type: token_type.into(),
            access_token: access_token.into(),
            expires_in,
            user: None,
        }
    }

    /// Value for the `Authorization` header: `"<type> <value>"`
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token_type", &self.token_type)
            .field("access_token", &redact(&self.access_token))
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish()
    }
}

/// Long-lived renewal credential delivered through `Set-Cookie`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalCookie {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl RenewalCookie {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self { value: value.into(), expires_at }
    }

    /// Placeholder returned when nothing has been persisted yet.
    ///
    /// Always expired: empty value, expiry at the Unix epoch.
    pub fn empty() -> Self {
        Self { value: String::new(), expires_at: DateTime::<Utc>::default() }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.value.is_empty() || self.expires_at <= now
    }

    /// Cookie value truncated for log output
    pub fn redacted_value(&self) -> String {
        redact(&self.value)
    }
}

impl Default for RenewalCookie {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for RenewalCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenewalCookie")
            .field("value", &self.redacted_value())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn redact(secret: &str) -> String {
    if secret.chars().count() <= LOGGED_COOKIE_PREFIX_LEN {
        return secret.to_string();
    }
    let prefix: String = secret.chars().take(LOGGED_COOKIE_PREFIX_LEN).collect();
    format!("{prefix}...")
}
