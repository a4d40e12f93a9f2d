//! Protocol constants
//!
//! Centralized location for the fixed endpoints, header values and storage
//! slots used by the client.

// Refresh handshake
pub const ACCESS_PATH: &str = "/access";
pub const RENEWAL_COOKIE_NAME: &str = "zuid";
pub const ACCESS_TOKEN_QUERY_PARAM: &str = "access_token";

// Backend error labels with protocol meaning
pub const LABEL_INVALID_CREDENTIALS: &str = "invalid-credentials";

// Persisted renewal cookie slot
pub const AUTH_TABLE_NAME: &str = "authentication";
pub const AUTH_COOKIE_KEY: &str = "cookie";

// Response payload cap (100 MiB)
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 104_857_600;

// Request queue
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 4;

// Transport timeouts
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// Logged cookie values are truncated to this many characters
pub const LOGGED_COOKIE_PREFIX_LEN: usize = 20;
