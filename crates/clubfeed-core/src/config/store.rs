//! Durable key-value store configuration.

use serde::{Deserialize, Serialize};

/// Key-value store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend: `"memory"` or `"file"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// File used by the `"file"` backend.
    #[serde(default = "default_path")]
    pub path: String,
    /// Namespace of the persisted feed key.
    #[serde(default = "default_feed_namespace")]
    pub feed_namespace: String,
    /// Namespace of the persisted watermark key.
    #[serde(default = "default_meta_namespace")]
    pub meta_namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            path: default_path(),
            feed_namespace: default_feed_namespace(),
            meta_namespace: default_meta_namespace(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_path() -> String {
    "data/clubfeed.json".to_string()
}

fn default_feed_namespace() -> String {
    "news_feed".to_string()
}

fn default_meta_namespace() -> String {
    "news_meta".to_string()
}
