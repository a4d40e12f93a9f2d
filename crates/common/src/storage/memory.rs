//! In-memory storage engine

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::error::{StorageError, StorageResult};
use super::types::StoreEngine;

type Table = HashMap<String, Value>;

/// Process-local engine backed by nested hash maps
#[derive(Debug, Default)]
pub struct MemoryEngine {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreEngine for MemoryEngine {
    async fn create(&self, table: &str, key: &str, record: Value) -> StorageResult<()> {
        let mut tables = self.tables.write();
        let entries = tables.entry(table.to_string()).or_default();
        if entries.contains_key(key) {
            return Err(StorageError::already_exists(table, key));
        }
        entries.insert(key.to_string(), record);
        Ok(())
    }

    async fn read(&self, table: &str, key: &str) -> StorageResult<Value> {
        self.tables
            .read()
            .get(table)
            .and_then(|entries| entries.get(key))
            .cloned()
            .ok_or_else(|| StorageError::not_found(table, key))
    }

    async fn update(&self, table: &str, key: &str, record: Value) -> StorageResult<()> {
        let mut tables = self.tables.write();
        match tables.get_mut(table).and_then(|entries| entries.get_mut(key)) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(StorageError::not_found(table, key)),
        }
    }

    async fn delete(&self, table: &str, key: &str) -> StorageResult<()> {
        if let Some(entries) = self.tables.write().get_mut(table) {
            entries.remove(key);
        }
        Ok(())
    }

    async fn read_all_primary_keys(&self, table: &str) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .tables
            .read()
            .get(table)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
