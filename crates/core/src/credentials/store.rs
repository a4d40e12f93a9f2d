//! Storage-backed cookie store

use std::sync::Arc;

use async_trait::async_trait;
use authwire_common::storage::{StorageError, StoreEngine};
use authwire_domain::constants::{AUTH_COOKIE_KEY, AUTH_TABLE_NAME};
use authwire_domain::{AuthWireError, RenewalCookie, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::ports::CookieStore;

/// Persisted shape of the renewal cookie
#[derive(Debug, Serialize, Deserialize)]
struct CookieRecord {
    /// RFC 3339 on write; epoch milliseconds are accepted on read
    expiration: Value,
    #[serde(alias = "zuid")]
    value: String,
}

impl CookieRecord {
    fn from_cookie(cookie: &RenewalCookie) -> Self {
        Self {
            expiration: Value::String(cookie.expires_at.to_rfc3339()),
            value: cookie.value.clone(),
        }
    }

    fn into_cookie(self) -> RenewalCookie {
        let expires_at = parse_expiration(&self.expiration).unwrap_or_else(|| {
            warn!(expiration = %self.expiration, "Unreadable cookie expiration, treating as expired");
            DateTime::<Utc>::default()
        });
        RenewalCookie::new(self.value, expires_at)
    }
}

fn parse_expiration(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .or_else(|_| DateTime::parse_from_rfc2822(text))
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Number(millis) => {
            millis.as_i64().and_then(|millis| Utc.timestamp_millis_opt(millis).single())
        }
        _ => None,
    }
}

fn storage_error(err: StorageError) -> AuthWireError {
    AuthWireError::Storage(err.to_string())
}

/// [`CookieStore`] writing a single record (`authentication`/`cookie`)
///
/// Saves are serialized so concurrent refreshes cannot interleave their
/// create/update sequences.
#[derive(Debug)]
pub struct CredentialStore {
    engine: Arc<dyn StoreEngine>,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(engine: Arc<dyn StoreEngine>) -> Self {
        Self { engine, write_lock: Mutex::new(()) }
    }

    pub fn engine(&self) -> &Arc<dyn StoreEngine> {
        &self.engine
    }
}

#[async_trait]
impl CookieStore for CredentialStore {
    async fn load(&self) -> Result<RenewalCookie> {
        let raw = match self.engine.read(AUTH_TABLE_NAME, AUTH_COOKIE_KEY).await {
            Ok(raw) => raw,
            Err(err) if err.is_not_found() => {
                debug!("No renewal cookie stored");
                return Ok(RenewalCookie::empty());
            }
            Err(err) => return Err(storage_error(err)),
        };

        match serde_json::from_value::<CookieRecord>(raw) {
            Ok(record) => Ok(record.into_cookie()),
            Err(err) => {
                warn!(error = %err, "Malformed renewal cookie record, ignoring it");
                Ok(RenewalCookie::empty())
            }
        }
    }

    async fn save(&self, cookie: &RenewalCookie) -> Result<()> {
        let record = serde_json::to_value(CookieRecord::from_cookie(cookie))
            .map_err(|err| AuthWireError::Internal(err.to_string()))?;

        let _guard = self.write_lock.lock().await;
        match self.engine.create(AUTH_TABLE_NAME, AUTH_COOKIE_KEY, record.clone()).await {
            Ok(()) => {}
            Err(err) if err.is_already_exists() => {
                self.engine
                    .update(AUTH_TABLE_NAME, AUTH_COOKIE_KEY, record)
                    .await
                    .map_err(storage_error)?;
            }
            Err(err) => return Err(storage_error(err)),
        }

        info!(
            cookie = %cookie.redacted_value(),
            expires_at = %cookie.expires_at,
            "Saved renewal cookie"
        );
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.engine.delete(AUTH_TABLE_NAME, AUTH_COOKIE_KEY).await.map_err(storage_error)?;
        debug!("Cleared renewal cookie");
        Ok(())
    }
}
