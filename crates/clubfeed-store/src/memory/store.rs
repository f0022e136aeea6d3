//! In-memory key-value store implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use clubfeed_core::result::AppResult;
use clubfeed_core::traits::kv_store::KeyValueStore;

/// Process-local key-value store.
///
/// Clones share the same map, so a test can keep a handle and inspect
/// what the aggregator wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let map = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut map = self.entries.write().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut map = self.entries.write().unwrap_or_else(|e| e.into_inner());
        map.remove(key);
        Ok(())
    }

    async fn set_many(&self, entries: &[(String, String)]) -> AppResult<()> {
        // One write lock for the whole batch so readers never see half of it.
        let mut map = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for (key, value) in entries {
            map.insert(key.clone(), value.clone());
        }
        debug!(count = entries.len(), "Wrote key batch");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
