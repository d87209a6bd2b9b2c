use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use fs4::tokio::AsyncFileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

/// Name of the data file inside the application directory.
pub const STORE_FILE_NAME: &str = "timeflow-data.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data file i/o failed")]
    Io(#[from] std::io::Error),
    #[error("data file contains invalid json")]
    Corrupt(#[from] serde_json::Error),
}

/// The whole contents of the data file: a JSON object mapping feature keys to
/// their state. The file is always rewritten as a complete snapshot, updating
/// one key means merging it into the full object and saving everything back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreBlob(serde_json::Map<String, Value>);

impl StoreBlob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// File-backed realization of the load/save surface. The bridge has exactly
/// two operations, reading the whole blob and overwriting it, there is no
/// key-level access at this layer.
pub struct FileBridge {
    path: PathBuf,
}

impl FileBridge {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the data file. A missing file is not an error, it simply means
    /// nothing was saved yet. Unparseable contents surface as
    /// [StoreError::Corrupt] so callers can decide how to degrade.
    pub async fn load(&self) -> Result<Option<StoreBlob>, StoreError> {
        let file = match File::open(&self.path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        debug!("Loading data file {:?}", self.path);
        file.lock_shared()?;
        let contents = Self::read_contents(file).await?;

        let blob = serde_json::from_str::<StoreBlob>(&contents)?;
        Ok(Some(blob))
    }

    async fn read_contents(mut file: File) -> Result<String, StoreError> {
        let mut contents = String::new();
        let read = file.read_to_string(&mut contents).await;
        file.unlock_async().await?;
        read?;
        Ok(contents)
    }

    /// Serializes the blob as pretty-printed JSON and replaces the file
    /// contents with it.
    pub async fn save(&self, blob: &StoreBlob) -> Result<(), StoreError> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        debug!("Saving {} keys into {:?}", blob.len(), self.path);
        // Semi-safe acquire-release for the file
        file.lock_exclusive()?;
        let result = Self::overwrite(&mut file, blob).await;
        file.unlock_async().await?;
        result
    }

    async fn overwrite(file: &mut File, blob: &StoreBlob) -> Result<(), StoreError> {
        let buffer = serde_json::to_vec_pretty(blob)?;
        file.set_len(0).await?;
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;

    use super::{FileBridge, StoreBlob, StoreError};

    #[tokio::test]
    async fn test_load_missing_file() -> Result<()> {
        let dir = tempdir()?;
        let bridge = FileBridge::new(dir.path());

        assert!(bridge.load().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let bridge = FileBridge::new(dir.path());

        let mut blob = StoreBlob::new();
        blob.insert("settings", json!({"meta_diaria_minutos": 240}));
        blob.insert("tasks", json!([{"id": 1, "title": "write tests"}]));

        bridge.save(&blob).await?;

        let loaded = bridge.load().await?.unwrap();
        assert_eq!(loaded, blob);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_contents() -> Result<()> {
        let dir = tempdir()?;
        let bridge = FileBridge::new(dir.path());

        let mut first = StoreBlob::new();
        first.insert(
            "sessions",
            json!([{"minutes": 25}, {"minutes": 50}, {"minutes": 15}]),
        );
        bridge.save(&first).await?;

        // The second blob serializes shorter than the first, a stale tail
        // would break parsing.
        let mut second = StoreBlob::new();
        second.insert("sessions", json!([]));
        bridge.save(&second).await?;

        let loaded = bridge.load().await?.unwrap();
        assert_eq!(loaded, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_corrupt_file() -> Result<()> {
        let dir = tempdir()?;
        let bridge = FileBridge::new(dir.path());

        std::fs::write(bridge.path(), "{ not json")?;

        let result = bridge.load().await;
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed() -> Result<()> {
        let dir = tempdir()?;
        let bridge = FileBridge::new(dir.path());

        let mut blob = StoreBlob::new();
        blob.insert("settings", json!({"meta_diaria_minutos": 240}));
        bridge.save(&blob).await?;

        let raw = std::fs::read_to_string(bridge.path())?;
        assert_eq!(
            raw,
            "{\n  \"settings\": {\n    \"meta_diaria_minutos\": 240\n  }\n}"
        );
        Ok(())
    }
}
