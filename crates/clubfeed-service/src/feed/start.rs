//! Start-event detection.
//!
//! A scheduled item fires once when its start time falls inside the
//! trailing window `(window_start, now]`, where `window_start` is the later
//! of the last scan and `now - window`. Only starts with an explicit clock
//! time qualify. Fired starts are remembered in `seen_starts`.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use clubfeed_core::types::kind::SourceKind;
use clubfeed_entity::record::{ScheduledAt, SourceRecord, start_iso};
use clubfeed_entity::watermark::WatermarkStore;

use super::signature::PERSONAL_SCOPE;

/// The trailing window scanned by one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartWindow {
    /// Exclusive lower bound.
    pub opened_at: DateTime<Utc>,
    /// Inclusive upper bound.
    pub now: DateTime<Utc>,
}

impl StartWindow {
    /// Window for a pass at `now`, given when the previous scan ran.
    pub fn new(last_check: Option<DateTime<Utc>>, now: DateTime<Utc>, length: Duration) -> Self {
        let floor = now - length;
        let opened_at = match last_check {
            Some(last) if last > floor => last,
            _ => floor,
        };
        Self { opened_at, now }
    }

    /// Whether `at` lies inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.opened_at < at && at <= self.now
    }
}

/// A start event ready to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartEvent {
    /// The scheduled start.
    pub starts_at: DateTime<Utc>,
    /// The `seen_starts` key recorded for it.
    pub key: String,
}

/// `seen_starts` key: `start:<kind>:<scopeId>:<sourceId>:<startIso>`.
pub fn start_key(
    kind: SourceKind,
    scope_id: Option<&str>,
    source_id: &str,
    start_iso: &str,
) -> String {
    let scope = scope_id.unwrap_or(PERSONAL_SCOPE);
    format!("start:{kind}:{scope}:{source_id}:{start_iso}")
}

/// Check one record against the window and, if it fires, mark it as
/// notified in `store`.
pub fn detect(
    record: &SourceRecord,
    window: &StartWindow,
    store: &mut WatermarkStore,
) -> Option<StartEvent> {
    let schedule = record.schedule()?;
    let starts_at = match schedule.resolve() {
        ScheduledAt::Timed(at) => at,
        ScheduledAt::DateOnly(_) => return None,
        ScheduledAt::Invalid => {
            debug!(
                kind = %record.kind(),
                source_id = %record.id(),
                value = %schedule.at,
                "Skipping start detection for unparsable schedule"
            );
            return None;
        }
    };

    if !window.contains(starts_at) {
        return None;
    }

    let iso = start_iso(starts_at);
    let key = start_key(
        record.kind(),
        record.org_id().map(|id| id.as_str()),
        record.id().as_str(),
        &iso,
    );
    if store.seen_starts.contains_key(&key) {
        return None;
    }
    store.seen_starts.insert(key.clone(), iso);
    Some(StartEvent { starts_at, key })
}

/// Drop `seen_starts` entries older than `floor`. Such starts lie before
/// every future window and can never fire again. Entries whose value does
/// not parse are dropped too.
pub fn prune_seen(store: &mut WatermarkStore, floor: DateTime<Utc>) -> usize {
    let before = store.seen_starts.len();
    store.seen_starts.retain(|_, at| {
        DateTime::parse_from_rfc3339(at)
            .map(|at| at.with_timezone(&Utc) > floor)
            .unwrap_or(false)
    });
    before - store.seen_starts.len()
}
