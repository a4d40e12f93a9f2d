//! Core storage trait definitions
//!
//! Engines are interchangeable behind [`StoreEngine`]; the credential store
//! and tests only ever see the trait.

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use super::error::StorageResult;

/// Table-scoped key/value record engine
#[async_trait]
pub trait StoreEngine: Send + Sync + Debug {
    /// Insert a new record
    ///
    /// # Errors
    /// `RecordAlreadyExists` when the key is taken.
    async fn create(&self, table: &str, key: &str, record: Value) -> StorageResult<()>;

    /// Read a record
    ///
    /// # Errors
    /// `RecordNotFound` when nothing is stored under the key.
    async fn read(&self, table: &str, key: &str) -> StorageResult<Value>;

    /// Replace an existing record
    ///
    /// # Errors
    /// `RecordNotFound` when nothing is stored under the key.
    async fn update(&self, table: &str, key: &str, record: Value) -> StorageResult<()>;

    /// Remove a record. Removing a missing record succeeds.
    async fn delete(&self, table: &str, key: &str) -> StorageResult<()>;

    /// Keys of every record in `table`; an unknown table yields no keys
    async fn read_all_primary_keys(&self, table: &str) -> StorageResult<Vec<String>>;

    /// Replace the record if present, insert it otherwise
    async fn update_or_create(&self, table: &str, key: &str, record: Value) -> StorageResult<()> {
        match self.update(table, key, record.clone()).await {
            Err(err) if err.is_not_found() => self.create(table, key, record).await,
            other => other,
        }
    }
}
