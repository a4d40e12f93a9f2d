//! Request body encodings

use std::fmt;

/// Body encodings the client sends natively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Json,
    ProtocolBuffer,
}

impl ContentType {
    /// Value for the `Content-Type` header
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::ProtocolBuffer => "application/x-protobuf",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
