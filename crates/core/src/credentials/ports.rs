//! Port interface for renewal-cookie persistence

use async_trait::async_trait;
use authwire_domain::{RenewalCookie, Result};

/// Persists the single renewal cookie of a session
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// Load the stored cookie
    ///
    /// Returns [`RenewalCookie::empty`] (always expired) when nothing has
    /// been stored yet.
    async fn load(&self) -> Result<RenewalCookie>;

    /// Store `cookie`, replacing any previous one
    async fn save(&self, cookie: &RenewalCookie) -> Result<()>;

    /// Forget the stored cookie. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<()>;
}
