//! The feed aggregator.
//!
//! [`FeedAggregator`] owns one user's pass pipeline and the in-memory
//! snapshot the UI renders. A pass reads the persisted state once, works
//! on a draft, and writes feed and watermark back once. Any error before
//! that write leaves the persisted state untouched.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info, warn};

use clubfeed_core::config::feed::FeedConfig;
use clubfeed_core::error::AppError;
use clubfeed_core::result::AppResult;
use clubfeed_core::traits::clock::{ClockFn, Now};
use clubfeed_core::traits::kv_store::KeyValueStore;
use clubfeed_core::traits::record_store::RecordStore;
use clubfeed_core::traits::session::SessionProvider;
use clubfeed_core::types::id::UserId;
use clubfeed_core::types::kind::SourceKind;
use clubfeed_core::types::session::SessionContext;
use clubfeed_entity::notification::{FeedEventType, NotificationItem};
use clubfeed_entity::record::SourceRecord;
use clubfeed_entity::watermark::WatermarkStore;
use clubfeed_store::StateKeys;

use super::item::{change_item, start_item};
use super::merge::merge_feed;
use super::signature::{self, Classification};
use super::sources::read_all;
use super::start::{self, StartWindow};
use super::state::{self, FeedState};

/// Counts reported by a completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// User the pass ran for.
    pub user_id: Option<UserId>,
    /// Visible records per kind that was read successfully.
    pub records_read: BTreeMap<SourceKind, usize>,
    /// Kinds whose source could not be reached.
    pub failed_sources: Vec<SourceKind>,
    /// `new` entries emitted.
    pub new_items: usize,
    /// `update` entries emitted.
    pub updated_items: usize,
    /// `start` entries emitted.
    pub started_items: usize,
    /// Expired `seen_starts` entries dropped.
    pub pruned_starts: usize,
    /// Signatures dropped for records no longer returned by their source.
    pub pruned_signatures: usize,
    /// Feed length after merging.
    pub feed_len: usize,
}

impl PassSummary {
    /// Total entries emitted by the pass.
    pub fn emitted(&self) -> usize {
        self.new_items + self.updated_items + self.started_items
    }
}

/// Result of a `refresh()` call.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Another pass was in flight; this trigger was dropped.
    Busy,
    /// Nobody is signed in.
    SignedOut,
    /// The pass ran and its state was persisted.
    Completed(PassSummary),
    /// The pass failed before persisting; stored state is unchanged.
    Failed(AppError),
}

impl RefreshOutcome {
    /// Summary of a completed pass.
    pub fn summary(&self) -> Option<&PassSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Clears the busy flag when dropped, including on early return.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Feed currently shown, tagged with the user it belongs to.
#[derive(Debug, Default)]
struct Snapshot {
    user_id: Option<UserId>,
    items: Arc<Vec<NotificationItem>>,
}

/// Aggregates record changes into a per-user news feed.
pub struct FeedAggregator {
    settings: FeedConfig,
    keys: StateKeys,
    store: Arc<dyn KeyValueStore>,
    records: Arc<dyn RecordStore<SourceRecord>>,
    session: Arc<dyn SessionProvider>,
    clock: Arc<dyn ClockFn>,
    busy: AtomicBool,
    snapshot: RwLock<Snapshot>,
}

impl std::fmt::Debug for FeedAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedAggregator")
            .field("settings", &self.settings)
            .field("keys", &self.keys)
            .field("busy", &self.is_busy())
            .finish()
    }
}

impl FeedAggregator {
    /// Create an aggregator using the system clock.
    pub fn new(
        settings: FeedConfig,
        keys: StateKeys,
        store: Arc<dyn KeyValueStore>,
        records: Arc<dyn RecordStore<SourceRecord>>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            settings,
            keys,
            store,
            records,
            session,
            clock: Arc::new(Now),
            busy: AtomicBool::new(false),
            snapshot: RwLock::new(Snapshot::default()),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn ClockFn>) -> Self {
        self.clock = clock;
        self
    }

    /// Whether a pass (or reset) is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The feed as of the last successful pass or load.
    pub fn snapshot(&self) -> Arc<Vec<NotificationItem>> {
        Arc::clone(&self.read_snapshot().items)
    }

    /// User the snapshot belongs to.
    pub fn snapshot_user(&self) -> Option<UserId> {
        self.read_snapshot().user_id.clone()
    }

    /// Fill the snapshot from the persisted feed without running a pass.
    ///
    /// Returns the number of entries loaded; zero when signed out.
    pub async fn load(&self) -> AppResult<usize> {
        let Some(ctx) = self.session.current() else {
            self.replace_snapshot(None, Vec::new());
            return Ok(0);
        };
        let feed = state::load_feed(self.store.as_ref(), &self.keys, &ctx.user_id).await?;
        let len = feed.len();
        info!(user_id = %ctx.user_id, feed_len = len, "Loaded persisted feed");
        self.replace_snapshot(Some(ctx.user_id), feed);
        Ok(len)
    }

    /// Run one pass for the current session.
    ///
    /// A trigger arriving while a pass is in flight is dropped.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("Refresh already in progress, dropping trigger");
            return RefreshOutcome::Busy;
        };

        let Some(ctx) = self.session.current() else {
            debug!("No session, skipping refresh");
            self.replace_snapshot(None, Vec::new());
            return RefreshOutcome::SignedOut;
        };

        if self.snapshot_user().as_ref() != Some(&ctx.user_id) {
            info!(user_id = %ctx.user_id, "Session changed, switching feed");
            let feed = state::load_feed(self.store.as_ref(), &self.keys, &ctx.user_id)
                .await
                .unwrap_or_default();
            self.replace_snapshot(Some(ctx.user_id.clone()), feed);
        }

        match self.run_pass(&ctx).await {
            Ok(summary) => {
                info!(
                    user_id = %ctx.user_id,
                    emitted = summary.emitted(),
                    new = summary.new_items,
                    updated = summary.updated_items,
                    started = summary.started_items,
                    failed_sources = summary.failed_sources.len(),
                    feed_len = summary.feed_len,
                    "Feed refresh completed"
                );
                RefreshOutcome::Completed(summary)
            }
            Err(e) => {
                warn!(user_id = %ctx.user_id, error = %e, "Feed refresh failed, state left unchanged");
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// Read the persisted watermark of the current user.
    pub async fn watermark(&self) -> AppResult<(UserId, WatermarkStore)> {
        let ctx = self.current_session()?;
        let watermark = state::load_watermark(self.store.as_ref(), &self.keys, &ctx.user_id).await?;
        Ok((ctx.user_id, watermark))
    }

    /// Delete the current user's feed and watermark.
    ///
    /// The next pass starts from scratch and reports every visible record
    /// as new. Refused while a pass is running.
    pub async fn reset(&self) -> AppResult<UserId> {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return Err(AppError::conflict("A feed refresh is in progress"));
        };
        let ctx = self.current_session()?;

        state::clear_state(self.store.as_ref(), &self.keys, &ctx.user_id).await?;
        self.replace_snapshot(Some(ctx.user_id.clone()), Vec::new());
        info!(user_id = %ctx.user_id, "Feed state reset");
        Ok(ctx.user_id)
    }

    async fn run_pass(&self, ctx: &SessionContext) -> AppResult<PassSummary> {
        let now = self.clock.now();
        let user_id = &ctx.user_id;

        let previous = state::load_state(self.store.as_ref(), &self.keys, user_id).await?;
        let batches = read_all(self.records.as_ref(), &self.settings.sources, ctx).await;

        let window = StartWindow::new(
            previous.watermark.last_start_check,
            now,
            Duration::minutes(self.settings.start_window_minutes),
        );
        let mut watermark = previous.watermark.clone();
        let mut emitted = Vec::new();
        let mut summary = PassSummary {
            user_id: Some(user_id.clone()),
            ..PassSummary::default()
        };

        for batch in &batches {
            if batch.failed {
                summary.failed_sources.push(batch.kind);
                continue;
            }
            summary.records_read.insert(batch.kind, batch.records.len());
            let mut live = HashSet::with_capacity(batch.records.len());

            for record in &batch.records {
                let fingerprint = signature::fingerprint(record.signature_fields());
                let key = signature::signature_key(
                    record.kind(),
                    record.org_id().map(|id| id.as_str()),
                    record.id().as_str(),
                );

                let event_type = match signature::classify(&key, &fingerprint, &watermark) {
                    Classification::New => Some(FeedEventType::New),
                    Classification::Changed => Some(FeedEventType::Update),
                    Classification::Unchanged => None,
                };
                if let Some(event_type) = event_type {
                    match event_type {
                        FeedEventType::Update => summary.updated_items += 1,
                        _ => summary.new_items += 1,
                    }
                    emitted.push(change_item(record, event_type, &fingerprint, now, ctx));
                }
                live.insert(key.clone());
                signature::record(key, fingerprint, &mut watermark);

                if let Some(event) = start::detect(record, &window, &mut watermark) {
                    summary.started_items += 1;
                    emitted.push(start_item(record, event.starts_at, ctx));
                }
            }

            summary.pruned_signatures += signature::prune_stale(&mut watermark, batch.kind, &live);
        }

        // A failed source could not be scanned, so the window stays open for
        // it. `seen_starts` keeps the other kinds from firing twice.
        if summary.failed_sources.is_empty() {
            watermark.last_start_check = Some(now);
        }
        // The next window never opens before this one.
        summary.pruned_starts = start::prune_seen(&mut watermark, window.opened_at);

        let feed = merge_feed(emitted, previous.feed, self.settings.max_items);
        summary.feed_len = feed.len();

        let next = FeedState { feed, watermark };
        state::save_state(self.store.as_ref(), &self.keys, user_id, &next).await?;

        self.replace_snapshot(Some(user_id.clone()), next.feed);
        Ok(summary)
    }

    fn current_session(&self) -> AppResult<SessionContext> {
        self.session
            .current()
            .ok_or_else(|| AppError::session("No user is signed in"))
    }

    fn read_snapshot(&self) -> std::sync::RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn replace_snapshot(&self, user_id: Option<UserId>, items: Vec<NotificationItem>) {
        let mut snapshot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        snapshot.user_id = user_id;
        snapshot.items = Arc::new(items);
    }
}
