use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{bridge::StoreError, service::StateStore};

/// Lifecycle of a [KeyedState]. Containers start Initializing and become
/// Ready exactly once, when the first load attempt finishes. The transition
/// never reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Initializing,
    Ready,
}

/// A typed value mirroring one key of the store. The consumer owns the
/// container for its whole lifetime: reads are plain borrows of the mirror,
/// while writes go back through the backing store once the container is
/// Ready. Until [hydrate](Self::hydrate) completes the value is the
/// caller-supplied default and writes only touch the mirror, which keeps a
/// slow initial load from being overwritten by an eager first write.
pub struct KeyedState<T> {
    store: Arc<dyn StateStore>,
    key: String,
    value: T,
    phase: LoadPhase,
}

impl<T: Serialize + DeserializeOwned> KeyedState<T> {
    pub fn new(store: Arc<dyn StateStore>, key: impl Into<String>, default: T) -> Self {
        Self {
            store,
            key: key.into(),
            value: default,
            phase: LoadPhase::Initializing,
        }
    }

    /// Performs the initial load. The container becomes Ready whether or not
    /// the key was present. A stored value of an unexpected shape keeps the
    /// default. Repeated calls are no-ops.
    pub async fn hydrate(&mut self) -> Result<(), StoreError> {
        if self.phase == LoadPhase::Ready {
            return Ok(());
        }

        if let Some(stored) = self.store.read(&self.key).await? {
            match serde_json::from_value(stored) {
                Ok(v) => self.value = v,
                Err(e) => {
                    warn!(
                        "Stored value under {:?} has an unexpected shape, keeping the default: {e}",
                        self.key
                    )
                }
            }
        }

        debug!("Hydrated key {:?}", self.key);
        self.phase = LoadPhase::Ready;
        Ok(())
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    /// Replaces the value. While Initializing only the in-memory mirror
    /// changes, afterwards every replacement is written through to the store.
    pub async fn set(&mut self, value: T) -> Result<(), StoreError> {
        self.value = value;
        self.persist().await
    }

    /// In-place variant of [set](Self::set) for collection values.
    pub async fn mutate(&mut self, apply: impl FnOnce(&mut T)) -> Result<(), StoreError> {
        apply(&mut self.value);
        self.persist().await
    }

    async fn persist(&self) -> Result<(), StoreError> {
        if self.phase == LoadPhase::Initializing {
            return Ok(());
        }
        let encoded = serde_json::to_value(&self.value)?;
        self.store.write(&self.key, encoded).await
    }
}
