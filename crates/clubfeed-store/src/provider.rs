//! Store manager that dispatches to the configured key-value backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use clubfeed_core::config::store::StoreConfig;
use clubfeed_core::error::AppError;
use clubfeed_core::result::AppResult;
use clubfeed_core::traits::kv_store::KeyValueStore;

/// Key-value store manager that wraps the configured backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner backend.
    inner: Arc<dyn KeyValueStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "file")]
            "file" => {
                info!(path = %config.path, "Initializing file key-value store");
                Arc::new(crate::file::FileKvStore::open(&config.path).await?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory key-value store");
                Arc::new(crate::memory::MemoryKvStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, file"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: store }
    }

    /// Get a reference to the inner backend.
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl KeyValueStore for StoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn set_many(&self, entries: &[(String, String)]) -> AppResult<()> {
        self.inner.set_many(entries).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
