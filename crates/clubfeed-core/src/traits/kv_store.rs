//! Durable key-value store trait for pluggable persistence backends.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for durable key-value backends (in-memory, file).
///
/// All values are strings (JSON). Keys embed the user id, see
/// `clubfeed_store::keys`.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Write several entries as one unit: either all of them become
    /// visible or none do.
    async fn set_many(&self, entries: &[(String, String)]) -> AppResult<()>;

    /// Check that the backend is usable.
    async fn health_check(&self) -> AppResult<bool>;
}
