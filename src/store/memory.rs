use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{bridge::StoreError, service::StateStore};

/// In-memory fallback used when no data directory is available. Keys live on
/// their own here, so a write never needs the whole-blob merge step of
/// [StoreService](super::service::StoreService). Contents are lost when the
/// process exits.
#[derive(Default)]
pub struct MemoryStore {
    data: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.get(key).map(|v| v.value().clone()))
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }
}
