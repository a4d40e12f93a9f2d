//! Key/value record storage
//!
//! This module provides the storage capability the credential store relies
//! on: named records grouped in tables, with distinct failures for a missing
//! record and for a record that already exists.
//!
//! Two engines ship with the crate:
//! - [`MemoryEngine`]: process-local, for tests and ephemeral sessions
//! - [`FileEngine`]: one JSON document per record, survives restarts

pub mod error;
#[cfg(feature = "runtime")]
pub mod file;
pub mod memory;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
#[cfg(feature = "runtime")]
pub use file::FileEngine;
pub use memory::MemoryEngine;
pub use types::StoreEngine;
