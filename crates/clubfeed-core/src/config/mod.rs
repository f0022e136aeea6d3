//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default, so an empty configuration gives a
//! working in-memory setup.

pub mod feed;
pub mod logging;
pub mod refresh;
pub mod session;
pub mod store;

use serde::{Deserialize, Serialize};

use self::feed::FeedConfig;
use self::logging::LoggingConfig;
use self::refresh::RefreshConfig;
use self::session::SessionConfig;
use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Durable key-value store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Feed aggregation settings.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Periodic refresh settings.
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Session used by headless runs.
    #[serde(default)]
    pub session: SessionConfig,
    /// Record source settings.
    #[serde(default)]
    pub records: RecordsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the fixture-backed record store reads its records from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Path to a JSON file of source records. `None` starts empty.
    #[serde(default)]
    pub fixture_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the given configuration file with an environment-specific
    /// overlay (`config/<env>.toml`) and environment variables prefixed
    /// with `CLUBFEED__`.
    pub fn load(config_path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CLUBFEED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject settings the aggregator cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.feed.max_items == 0 {
            return Err(AppError::configuration("feed.max_items must be positive"));
        }
        if self.feed.start_window_minutes <= 0 {
            return Err(AppError::configuration(
                "feed.start_window_minutes must be positive",
            ));
        }
        if self.store.provider == "file" && self.store.path.trim().is_empty() {
            return Err(AppError::configuration(
                "store.path is required for the file provider",
            ));
        }
        Ok(())
    }
}
