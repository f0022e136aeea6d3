//! Key-value store persisted to a single JSON file.
//!
//! The whole map is kept in memory and rewritten on every write: the new
//! content goes to `<path>.tmp` first and is then renamed over the real
//! file, so a crash mid-write leaves the previous content intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use clubfeed_core::error::{AppError, ErrorKind};
use clubfeed_core::result::AppResult;
use clubfeed_core::traits::kv_store::KeyValueStore;

/// Durable key-value store backed by one JSON object file.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKvStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// A missing file is an empty store.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Store file '{}' is not a JSON object: {e}", path.display()),
                    e,
                )
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), keys = entries.len(), "Opened file store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), keys = entries.len(), "Persisted file store");
        Ok(())
    }

    /// Apply `change` to a copy of the map, persist the copy, and only then
    /// make it the live map.
    async fn write_with<F>(&self, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut live = self.entries.lock().await;
        let mut next = live.clone();
        change(&mut next);
        self.persist(&next).await?;
        *live = next;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.write_with(|map| {
            map.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.write_with(|map| {
            map.remove(key);
        })
        .await
    }

    async fn set_many(&self, entries: &[(String, String)]) -> AppResult<()> {
        self.write_with(|map| {
            for (key, value) in entries {
                map.insert(key.clone(), value.clone());
            }
        })
        .await
    }

    async fn health_check(&self) -> AppResult<bool> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Ok(tokio::fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false))
    }
}
