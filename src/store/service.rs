use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::warn;

use super::bridge::{FileBridge, StoreBlob, StoreError};

/// Key-value surface the state containers are written against. Backed either
/// by [StoreService] or, when no data directory is usable, by the in-memory
/// fallback in [memory](super::memory).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn write(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Single owner of the data file. Every mutation is a whole-blob
/// read-merge-write, and the guard is held across all three steps so that two
/// writers updating different keys can never drop each other's update.
pub struct StoreService {
    bridge: FileBridge,
    guard: Mutex<()>,
}

impl StoreService {
    pub fn new(bridge: FileBridge) -> Self {
        Self {
            bridge,
            guard: Mutex::new(()),
        }
    }

    /// Current contents of the data file. Both a missing and an unreadable
    /// file degrade to the empty blob, corruption is logged but never stops
    /// the application from starting fresh.
    pub async fn snapshot(&self) -> Result<StoreBlob, StoreError> {
        match self.bridge.load().await {
            Ok(Some(blob)) => Ok(blob),
            Ok(None) => Ok(StoreBlob::new()),
            Err(StoreError::Corrupt(e)) => {
                warn!(
                    "Data file {:?} contains invalid json, treating it as empty: {e}",
                    self.bridge.path()
                );
                Ok(StoreBlob::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Merges one key into the blob and saves the result.
    pub async fn update(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.guard.lock().await;
        let mut blob = self.snapshot().await?;
        blob.insert(key, value);
        self.bridge.save(&blob).await
    }
}

#[async_trait]
impl StateStore for StoreService {
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.snapshot().await?.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.update(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::{
        store::bridge::{FileBridge, StoreBlob},
        utils::logging::TEST_LOGGING,
    };

    use super::{StateStore, StoreService};

    fn service(dir: &std::path::Path) -> StoreService {
        StoreService::new(FileBridge::new(dir))
    }

    #[tokio::test]
    async fn test_snapshot_of_missing_file_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let service = service(dir.path());

        assert_eq!(service.snapshot().await?, StoreBlob::new());
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_of_corrupt_file_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let service = service(dir.path());

        std::fs::write(dir.path().join("timeflow-data.json"), "]]]")?;

        assert_eq!(service.snapshot().await?, StoreBlob::new());
        Ok(())
    }

    #[tokio::test]
    async fn test_write_read_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let service = service(dir.path());

        let value = json!({"meta_diaria_minutos": 240});
        service.write("settings", value.clone()).await?;

        assert_eq!(service.read("settings").await?, Some(value));
        assert_eq!(service.read("tasks").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_sequential_updates_keep_both_keys() -> Result<()> {
        let dir = tempdir()?;
        let service = service(dir.path());

        service.update("k1", json!(1)).await?;
        service.update("k2", json!(2)).await?;

        let blob = service.snapshot().await?;
        assert_eq!(blob.get("k1"), Some(&json!(1)));
        assert_eq!(blob.get("k2"), Some(&json!(2)));
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_updates_keep_both_keys() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let service = Arc::new(service(dir.path()));

        let a = {
            let service = service.clone();
            tokio::spawn(async move { service.update("k1", json!("first")).await })
        };
        let b = {
            let service = service.clone();
            tokio::spawn(async move { service.update("k2", json!("second")).await })
        };

        a.await??;
        b.await??;

        let blob = service.snapshot().await?;
        assert_eq!(blob.get("k1"), Some(&json!("first")));
        assert_eq!(blob.get("k2"), Some(&json!("second")));
        Ok(())
    }
}
