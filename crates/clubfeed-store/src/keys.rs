//! Key builders for everything the aggregator persists.
//!
//! Keys have the form `"<namespace>:<userId>"` so that every account has
//! its own feed and watermark, and switching accounts starts clean.

use clubfeed_core::config::store::StoreConfig;
use clubfeed_core::types::id::UserId;

/// Namespaces of the two per-user state entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateKeys {
    feed_namespace: String,
    meta_namespace: String,
}

impl StateKeys {
    /// Build from explicit namespaces.
    pub fn new(feed_namespace: impl Into<String>, meta_namespace: impl Into<String>) -> Self {
        Self {
            feed_namespace: feed_namespace.into(),
            meta_namespace: meta_namespace.into(),
        }
    }

    /// Build from the store configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.feed_namespace, &config.meta_namespace)
    }

    /// Key of the persisted feed for a user.
    pub fn feed(&self, user_id: &UserId) -> String {
        format!("{}:{user_id}", self.feed_namespace)
    }

    /// Key of the persisted watermark for a user.
    pub fn meta(&self, user_id: &UserId) -> String {
        format!("{}:{user_id}", self.meta_namespace)
    }
}

impl Default for StateKeys {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}
