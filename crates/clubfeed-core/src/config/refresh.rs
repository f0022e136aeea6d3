//! Periodic refresh configuration.

use serde::{Deserialize, Serialize};

/// When the background worker triggers aggregation passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Whether the periodic trigger is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Run one pass immediately at startup.
    #[serde(default = "default_true")]
    pub run_on_start: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_schedule(),
            run_on_start: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_schedule() -> String {
    "0 */5 * * * *".to_string()
}
