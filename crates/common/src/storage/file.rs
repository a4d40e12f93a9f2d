//! File-backed storage engine
//!
//! Layout: `<root>/<table>/<key>.json`, one pretty-printed JSON document per
//! record. Creation uses `create_new` so two writers racing on the same key
//! cannot both succeed; updates go through a temporary file and a rename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::types::StoreEngine;

const RECORD_EXTENSION: &str = "json";

/// Engine persisting every record as a JSON file below a root directory
#[derive(Debug, Clone)]
pub struct FileEngine {
    root: PathBuf,
}

impl FileEngine {
    /// The root directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_dir(&self, table: &str) -> StorageResult<PathBuf> {
        validate_identifier(table)?;
        Ok(self.root.join(table))
    }

    fn record_path(&self, table: &str, key: &str) -> StorageResult<PathBuf> {
        validate_identifier(key)?;
        Ok(self.table_dir(table)?.join(format!("{key}.{RECORD_EXTENSION}")))
    }
}

#[async_trait]
impl StoreEngine for FileEngine {
    async fn create(&self, table: &str, key: &str, record: Value) -> StorageResult<()> {
        let path = self.record_path(table, key)?;
        fs::create_dir_all(self.table_dir(table)?).await?;

        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::already_exists(table, key));
            }
            Err(err) => return Err(err.into()),
        };

        file.write_all(&serde_json::to_vec_pretty(&record)?).await?;
        file.flush().await?;
        debug!(table, key, path = %path.display(), "Created record");
        Ok(())
    }

    async fn read(&self, table: &str, key: &str) -> StorageResult<Value> {
        let path = self.record_path(table, key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StorageError::not_found(table, key))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update(&self, table: &str, key: &str, record: Value) -> StorageResult<()> {
        let path = self.record_path(table, key)?;
        if !fs::try_exists(&path).await? {
            return Err(StorageError::not_found(table, key));
        }

        let staging = path.with_extension(format!("{RECORD_EXTENSION}.tmp"));
        fs::write(&staging, serde_json::to_vec_pretty(&record)?).await?;
        fs::rename(&staging, &path).await?;
        debug!(table, key, path = %path.display(), "Updated record");
        Ok(())
    }

    async fn delete(&self, table: &str, key: &str) -> StorageResult<()> {
        let path = self.record_path(table, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn read_all_primary_keys(&self, table: &str) -> StorageResult<Vec<String>> {
        let dir = self.table_dir(table)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Table names and keys become path segments; reject anything that could
/// escape the root directory.
fn validate_identifier(identifier: &str) -> StorageResult<()> {
    let invalid = identifier.is_empty()
        || identifier == "."
        || identifier == ".."
        || identifier.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StorageError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_record_lifecycle() {
        let dir = TempDir::new().unwrap();
        let engine = FileEngine::new(dir.path());

        engine.create("authentication", "cookie", json!({"value": "a"})).await.unwrap();
        assert!(dir.path().join("authentication").join("cookie.json").exists());
        assert_eq!(
            engine.read("authentication", "cookie").await.unwrap(),
            json!({"value": "a"})
        );

        engine.update("authentication", "cookie", json!({"value": "b"})).await.unwrap();
        assert_eq!(
            engine.read("authentication", "cookie").await.unwrap(),
            json!({"value": "b"})
        );

        engine.delete("authentication", "cookie").await.unwrap();
        assert!(engine.read("authentication", "cookie").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_contract_errors() {
        let dir = TempDir::new().unwrap();
        let engine = FileEngine::new(dir.path());

        assert!(engine.read("t", "k").await.unwrap_err().is_not_found());
        assert!(engine.update("t", "k", json!(1)).await.unwrap_err().is_not_found());

        engine.create("t", "k", json!(1)).await.unwrap();
        assert!(engine.create("t", "k", json!(2)).await.unwrap_err().is_already_exists());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let engine = FileEngine::new(dir.path());

        for key in ["", "..", "a/b", "a\\b"] {
            let err = engine.create("t", key, json!(1)).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidIdentifier(_)), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn test_primary_keys_skip_staging_files() {
        let dir = TempDir::new().unwrap();
        let engine = FileEngine::new(dir.path());
        engine.create("t", "one", json!(1)).await.unwrap();
        engine.create("t", "two", json!(2)).await.unwrap();
        std::fs::write(dir.path().join("t").join("two.json.tmp"), b"{}").unwrap();

        assert_eq!(engine.read_all_primary_keys("t").await.unwrap(), vec!["one", "two"]);
        assert!(engine.read_all_primary_keys("empty").await.unwrap().is_empty());
    }
}
