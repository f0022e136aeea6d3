//! Source readers.
//!
//! One reader per record kind queries the record store for the session's
//! scope and narrows the result to what the user may actually see. Kinds
//! are read concurrently; a kind whose query fails contributes nothing
//! this pass and never aborts the others.

use futures::future::join_all;
use tracing::{debug, warn};

use clubfeed_core::config::feed::{SourceSettings, SourcesConfig};
use clubfeed_core::traits::record_store::RecordStore;
use clubfeed_core::types::kind::SourceKind;
use clubfeed_core::types::scope::ScopeFilter;
use clubfeed_core::types::session::SessionContext;
use clubfeed_entity::record::SourceRecord;

/// Visible records of one kind.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    /// Kind that was read.
    pub kind: SourceKind,
    /// Visible records; empty when the read failed.
    pub records: Vec<SourceRecord>,
    /// Whether the store could not be reached for this kind.
    pub failed: bool,
}

/// Whether `ctx` may see `record` under the kind's `settings`.
pub fn is_visible(record: &SourceRecord, settings: SourceSettings, ctx: &SessionContext) -> bool {
    if settings.exclude_own && record.author_id() == Some(&ctx.user_id) {
        return false;
    }

    match record.org_id() {
        Some(org_id) => {
            if ctx.membership(org_id).is_none() {
                return false;
            }
            match record.group_id() {
                Some(group_id) => ctx.can_see_group(org_id, group_id),
                None => true,
            }
        }
        None => record.owner_id() == Some(&ctx.user_id),
    }
}

/// Read every enabled kind for `ctx`.
///
/// Batches come back in [`SourceKind::ALL`] order regardless of which
/// query finished first.
pub async fn read_all(
    store: &dyn RecordStore<SourceRecord>,
    sources: &SourcesConfig,
    ctx: &SessionContext,
) -> Vec<SourceBatch> {
    let filter = ScopeFilter::for_session(ctx);
    let reads = SourceKind::ALL
        .iter()
        .copied()
        .filter(|kind| {
            let enabled = sources.for_kind(*kind).enabled;
            if !enabled {
                debug!(%kind, "Source disabled, skipping");
            }
            enabled
        })
        .map(|kind| read_kind(store, kind, sources.for_kind(kind), &filter, ctx));

    join_all(reads).await
}

async fn read_kind(
    store: &dyn RecordStore<SourceRecord>,
    kind: SourceKind,
    settings: SourceSettings,
    filter: &ScopeFilter,
    ctx: &SessionContext,
) -> SourceBatch {
    match store.query(kind, filter).await {
        Ok(records) => {
            let fetched = records.len();
            let records: Vec<SourceRecord> = records
                .into_iter()
                .filter(|r| r.kind() == kind && is_visible(r, settings, ctx))
                .collect();
            debug!(%kind, fetched, visible = records.len(), "Source read");
            SourceBatch {
                kind,
                records,
                failed: false,
            }
        }
        Err(e) => {
            warn!(%kind, error = %e, "Source unavailable, continuing without it");
            SourceBatch {
                kind,
                records: Vec::new(),
                failed: true,
            }
        }
    }
}
