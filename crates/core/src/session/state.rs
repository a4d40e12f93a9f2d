use authwire_domain::{AccessToken, ConnectionState};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Buffered connectivity transitions per subscriber before it lags
pub const CONNECTION_EVENT_CAPACITY: usize = 16;

/// Current access token and connectivity of one client
///
/// Requests take a snapshot of the token; only a refresh replaces it.
/// Connectivity observers are notified on transitions only, never on a
/// repeated value.
#[derive(Debug)]
pub struct SessionState {
    token: RwLock<Option<AccessToken>>,
    connection: Mutex<ConnectionState>,
    transitions: broadcast::Sender<ConnectionState>,
}

impl SessionState {
    pub fn new() -> Self {
        let (transitions, _) = broadcast::channel(CONNECTION_EVENT_CAPACITY);
        Self {
            token: RwLock::new(None),
            connection: Mutex::new(ConnectionState::default()),
            transitions,
        }
    }

    /// Snapshot of the held token, if any
    pub fn access_token(&self) -> Option<AccessToken> {
        self.token.read().clone()
    }

    pub fn has_access_token(&self) -> bool {
        self.token.read().as_ref().is_some_and(|token| !token.is_empty())
    }

    /// Install a freshly issued token, replacing the previous one
    pub fn replace_access_token(&self, token: AccessToken) {
        debug!(token_type = %token.token_type, expires_in = token.expires_in, "Access token replaced");
        *self.token.write() = Some(token);
    }

    pub fn clear_access_token(&self) {
        *self.token.write() = None;
    }

    /// Whether `candidate` is still the held token
    pub fn is_current(&self, candidate: Option<&AccessToken>) -> bool {
        self.token.read().as_ref() == candidate
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.lock()
    }

    /// Record a request outcome; returns `true` if the state changed
    pub fn set_connection_state(&self, next: ConnectionState) -> bool {
        let mut current = self.connection.lock();
        if *current == next {
            return false;
        }

        info!(from = %*current, to = %next, "Connection state changed");
        *current = next;
        // No subscribers is fine
        let _ = self.transitions.send(next);
        true
    }

    /// Receive every future connectivity transition
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionState> {
        self.transitions.subscribe()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
