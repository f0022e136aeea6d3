//! Record store serving source records from memory.
//!
//! Used by headless runs (loading a JSON fixture exported from the
//! backend) and by tests, which swap the record set between passes and
//! mark kinds as unreachable.

use std::collections::HashSet;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, info};

use clubfeed_core::error::AppError;
use clubfeed_core::result::AppResult;
use clubfeed_core::traits::record_store::RecordStore;
use clubfeed_core::types::kind::SourceKind;
use clubfeed_core::types::scope::ScopeFilter;
use clubfeed_entity::record::SourceRecord;

/// In-process record store.
#[derive(Debug, Default)]
pub struct FixtureRecordStore {
    records: RwLock<Vec<SourceRecord>>,
    unavailable: RwLock<HashSet<SourceKind>>,
}

impl FixtureRecordStore {
    /// Create a store holding `records`.
    pub fn new(records: Vec<SourceRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            unavailable: RwLock::new(HashSet::new()),
        }
    }

    /// Load records from a JSON array file.
    pub async fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let records: Vec<SourceRecord> = serde_json::from_str(&content)?;
        info!(path = %path.display(), count = records.len(), "Loaded record fixture");
        Ok(Self::new(records))
    }

    /// Replace the whole record set.
    pub fn replace(&self, records: Vec<SourceRecord>) {
        *self.records.write().unwrap_or_else(|e| e.into_inner()) = records;
    }

    /// Add or replace one record (matched by kind and id).
    pub fn upsert(&self, record: SourceRecord) {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        match records
            .iter_mut()
            .find(|r| r.kind() == record.kind() && r.id() == record.id())
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Make queries for `kind` fail (or succeed again).
    pub fn set_unavailable(&self, kind: SourceKind, unavailable: bool) {
        let mut set = self.unavailable.write().unwrap_or_else(|e| e.into_inner());
        if unavailable {
            set.insert(kind);
        } else {
            set.remove(&kind);
        }
    }
}

/// Organization records by org id and group, personal records by owner.
fn in_scope(record: &SourceRecord, filter: &ScopeFilter) -> bool {
    match (record.org_id(), record.group_id()) {
        (Some(org_id), Some(group_id)) => filter.includes_group(org_id, group_id),
        (Some(org_id), None) => filter.includes_org(org_id),
        (None, _) => match (record.owner_id(), filter.owner_id.as_ref()) {
            (Some(owner), Some(wanted)) => owner == wanted,
            _ => false,
        },
    }
}

#[async_trait]
impl RecordStore<SourceRecord> for FixtureRecordStore {
    async fn query(&self, kind: SourceKind, filter: &ScopeFilter) -> AppResult<Vec<SourceRecord>> {
        if self
            .unavailable
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&kind)
        {
            return Err(AppError::source_unavailable(format!(
                "{kind} records are unreachable"
            )));
        }

        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        let matched: Vec<SourceRecord> = records
            .iter()
            .filter(|r| r.kind() == kind && in_scope(r, filter))
            .cloned()
            .collect();
        debug!(%kind, count = matched.len(), "Fixture query");
        Ok(matched)
    }
}
