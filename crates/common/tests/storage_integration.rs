//! Integration tests for storage engines
//!
//! Both engines must honour the same contract: distinct "not found" and
//! "already exists" failures, idempotent delete, create-or-update.

#![cfg(feature = "runtime")]

use std::sync::Arc;

use authwire_common::storage::{FileEngine, MemoryEngine, StorageResult, StoreEngine};
use serde_json::json;
use tempfile::TempDir;

async fn exercise_contract(engine: Arc<dyn StoreEngine>) -> StorageResult<()> {
    let table = "authentication";

    let missing = engine.read(table, "cookie").await.unwrap_err();
    assert!(missing.is_not_found());

    engine.create(table, "cookie", json!({ "value": "a" })).await?;
    let duplicate = engine.create(table, "cookie", json!({ "value": "b" })).await.unwrap_err();
    assert!(duplicate.is_already_exists());
    assert_eq!(engine.read(table, "cookie").await?, json!({ "value": "a" }));

    engine.update_or_create(table, "cookie", json!({ "value": "c" })).await?;
    engine.update_or_create(table, "other", json!({ "value": "d" })).await?;
    assert_eq!(engine.read(table, "cookie").await?, json!({ "value": "c" }));

    let mut keys = engine.read_all_primary_keys(table).await?;
    keys.sort();
    assert_eq!(keys, vec!["cookie".to_string(), "other".to_string()]);

    engine.delete(table, "cookie").await?;
    engine.delete(table, "cookie").await?;
    assert!(engine.read(table, "cookie").await.unwrap_err().is_not_found());

    let missing_update = engine.update(table, "cookie", json!({})).await.unwrap_err();
    assert!(missing_update.is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_memory_engine_contract() -> StorageResult<()> {
    exercise_contract(Arc::new(MemoryEngine::new())).await
}

#[tokio::test]
async fn test_file_engine_contract() -> StorageResult<()> {
    let dir = TempDir::new()?;
    exercise_contract(Arc::new(FileEngine::new(dir.path()))).await
}

#[tokio::test]
async fn test_file_engine_survives_reopen() -> StorageResult<()> {
    let dir = TempDir::new()?;

    FileEngine::new(dir.path())
        .create("authentication", "cookie", json!({ "value": "persisted" }))
        .await?;

    let reopened = FileEngine::new(dir.path());
    assert_eq!(
        reopened.read("authentication", "cookie").await?,
        json!({ "value": "persisted" })
    );
    Ok(())
}
