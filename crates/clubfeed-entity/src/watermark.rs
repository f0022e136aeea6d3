//! Per-user watermark state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the aggregator has already observed for one user.
///
/// Read once at the start of a pass, mutated as a draft, and written back
/// together with the feed at the end of a successful pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkStore {
    /// Last observed fingerprint per `kind:scope:sourceId`.
    #[serde(default)]
    pub signatures: BTreeMap<String, String>,
    /// Start events already emitted, keyed `start:kind:scopeId:sourceId:startIso`,
    /// valued with the start timestamp.
    #[serde(default)]
    pub seen_starts: BTreeMap<String, String>,
    /// When the start window was last scanned.
    #[serde(default)]
    pub last_start_check: Option<DateTime<Utc>>,
}

impl WatermarkStore {
    /// Whether nothing has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty() && self.seen_starts.is_empty() && self.last_start_check.is_none()
    }
}
