//! Integration tests for aggregation passes: change detection, merging,
//! visibility and failure handling.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::watch;

use clubfeed_core::config::feed::FeedConfig;
use clubfeed_core::error::ErrorKind;
use clubfeed_core::result::AppResult;
use clubfeed_core::traits::kv_store::KeyValueStore;
use clubfeed_core::traits::record_store::RecordStore;
use clubfeed_core::types::id::{GroupId, UserId};
use clubfeed_core::types::kind::SourceKind;
use clubfeed_core::types::scope::ScopeFilter;
use clubfeed_core::types::session::MemberRole;
use clubfeed_entity::notification::{FeedCategory, FeedEventType};
use clubfeed_entity::record::{Schedule, SourceRecord};
use clubfeed_service::{FeedAggregator, RefreshOutcome};
use clubfeed_store::{FixtureRecordStore, StateKeys};

use helpers::*;

#[tokio::test]
async fn test_announcement_scenario() {
    let app = TestApp::new();
    let mut training = announcement("a1", "Training", "18:00 Uhr");
    training.event_date = Some(Schedule::new("2024-05-01"));
    app.records.replace(vec![SourceRecord::Announcement(training.clone())]);

    let first = app.pass().await;
    assert_eq!(first.new_items, 1);
    assert_eq!(first.emitted(), 1);
    let feed = app.feed();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].category, FeedCategory::Announcement);
    assert_eq!(feed[0].event_type, FeedEventType::New);
    assert_eq!(feed[0].source_id.as_str(), "a1");
    assert_eq!(feed[0].change_text, "Aenderung: Training");
    assert_eq!(feed[0].category_label, "Ankuendigung");
    assert_eq!(feed[0].org_name.as_deref(), Some(ORG_NAME));

    let second = app.pass().await;
    assert_eq!(second.emitted(), 0);
    assert_eq!(app.feed().len(), 1);

    let meta_before = app.stored_meta(ME).await.unwrap();
    training.body = Some("19:00 Uhr".to_string());
    app.records.upsert(SourceRecord::Announcement(training));
    app.clock.advance(Duration::minutes(1));

    let third = app.pass().await;
    assert_eq!(third.updated_items, 1);
    assert_eq!(third.emitted(), 1);
    let feed = app.feed();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].event_type, FeedEventType::Update);
    assert_eq!(feed[0].change_text, "Aenderung: Training");
    assert_ne!(app.stored_meta(ME).await.unwrap(), meta_before);
}

#[tokio::test]
async fn test_unchanged_data_leaves_feed_identical() {
    let app = TestApp::new();
    app.records.replace(vec![
        SourceRecord::Announcement(announcement("a1", "Training", "18:00 Uhr")),
        SourceRecord::Assignment(assignment("as1", "Bericht", Some("2024-05-03"))),
        SourceRecord::Tasklist(task("t1", "Trikots waschen", None)),
    ]);

    assert_eq!(app.pass().await.emitted(), 3);
    let feed_before = app.stored_feed(ME).await.unwrap();

    app.clock.advance(Duration::minutes(5));
    assert_eq!(app.pass().await.emitted(), 0);
    assert_eq!(app.stored_feed(ME).await.unwrap(), feed_before);
}

#[tokio::test]
async fn test_new_text_for_non_announcements() {
    let app = TestApp::new();
    app.records.replace(vec![
        SourceRecord::Exercise(exercise("e1", "Handstand", None)),
        SourceRecord::Tasklist(task("t1", "Trikots waschen", None)),
    ]);
    app.pass().await;

    let feed = app.feed();
    let texts: Vec<&str> = feed.iter().map(|i| i.change_text.as_str()).collect();
    assert!(texts.contains(&"Neu: Handstand"));
    assert!(texts.contains(&"Neu: Trikots waschen"));

    let personal = feed.iter().find(|i| i.category == FeedCategory::Tasklist).unwrap();
    assert!(personal.is_personal());
    assert!(personal.org_name.is_none());
}

#[tokio::test]
async fn test_ids_are_deterministic_across_devices() {
    let data = vec![
        SourceRecord::Announcement(announcement("a1", "Training", "18:00 Uhr")),
        SourceRecord::Exercise(exercise("e1", "Handstand", None)),
    ];
    let phone = TestApp::new();
    let tablet = TestApp::new();
    phone.records.replace(data.clone());
    tablet.records.replace(data);
    tablet.clock.advance(Duration::hours(3));

    phone.pass().await;
    tablet.pass().await;

    let mut phone_ids: Vec<String> = phone.feed().into_iter().map(|i| i.id).collect();
    let mut tablet_ids: Vec<String> = tablet.feed().into_iter().map(|i| i.id).collect();
    phone_ids.sort();
    tablet_ids.sort();
    assert_eq!(phone_ids, tablet_ids);
    assert!(phone_ids.iter().any(|id| id.starts_with("announcement:new:a1:")));
}

#[tokio::test]
async fn test_feed_is_capped_and_newest_first() {
    let settings = FeedConfig {
        max_items: 5,
        ..FeedConfig::default()
    };
    let app = TestApp::with_settings(settings);

    for round in 0..4 {
        for n in 0..3 {
            let id = format!("t{round}-{n}");
            app.records.upsert(SourceRecord::Tasklist(task(&id, &id, None)));
        }
        app.clock.advance(Duration::minutes(10));
        let summary = app.pass().await;
        assert_eq!(summary.new_items, 3);
        assert!(summary.feed_len <= 5);
    }

    let feed = app.feed();
    assert_eq!(feed.len(), 5);
    assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    assert!(feed.iter().all(|i| !i.source_id.as_str().starts_with("t0-")));
    assert!(feed[..3].iter().all(|i| i.source_id.as_str().starts_with("t3-")));
}

#[tokio::test]
async fn test_unavailable_source_does_not_block_others() {
    let app = TestApp::new();
    app.records.replace(vec![
        SourceRecord::Announcement(announcement("a1", "Training", "18:00 Uhr")),
        SourceRecord::Assignment(assignment("as1", "Bericht", None)),
    ]);
    app.records.set_unavailable(SourceKind::Assignment, true);

    let summary = app.pass().await;
    assert_eq!(summary.failed_sources, vec![SourceKind::Assignment]);
    assert_eq!(summary.new_items, 1);
    assert_eq!(app.feed()[0].category, FeedCategory::Announcement);

    app.records.set_unavailable(SourceKind::Assignment, false);
    let summary = app.pass().await;
    assert!(summary.failed_sources.is_empty());
    assert_eq!(summary.new_items, 1);
    assert_eq!(app.feed()[0].category, FeedCategory::Assignment);
}

#[tokio::test]
async fn test_outage_does_not_forget_seen_records() {
    let app = TestApp::new();
    app.records
        .replace(vec![SourceRecord::Assignment(assignment("as1", "Bericht", None))]);
    app.pass().await;

    app.records.set_unavailable(SourceKind::Assignment, true);
    app.pass().await;
    app.records.set_unavailable(SourceKind::Assignment, false);

    assert_eq!(app.pass().await.emitted(), 0);
    assert_eq!(app.feed().len(), 1);
}

#[tokio::test]
async fn test_removed_records_drop_their_signature() {
    let app = TestApp::new();
    app.records.replace(vec![
        SourceRecord::Exercise(exercise("e1", "Handstand", None)),
        SourceRecord::Exercise(exercise("e2", "Radwende", None)),
        SourceRecord::Tasklist(task("t1", "Trikots waschen", None)),
    ]);
    app.pass().await;

    app.records.replace(vec![SourceRecord::Exercise(exercise("e1", "Handstand", None))]);
    app.records.set_unavailable(SourceKind::Tasklist, true);
    let summary = app.pass().await;
    assert_eq!(summary.pruned_signatures, 1);

    let meta: serde_json::Value =
        serde_json::from_str(&app.stored_meta(ME).await.unwrap()).unwrap();
    let keys: Vec<&String> = meta["signatures"].as_object().unwrap().keys().collect();
    assert!(keys.iter().any(|k| k.ends_with(":e1")));
    assert!(!keys.iter().any(|k| k.ends_with(":e2")));
    assert!(keys.iter().any(|k| k.ends_with(":t1")));

    app.records.upsert(SourceRecord::Exercise(exercise("e2", "Radwende", None)));
    assert_eq!(app.pass().await.new_items, 1);
}

#[tokio::test]
async fn test_write_failure_leaves_state_untouched() {
    let app = TestApp::new();
    app.records.replace(vec![SourceRecord::Announcement(announcement(
        "a1", "Training", "18:00 Uhr",
    ))]);
    app.pass().await;
    let feed_before = app.stored_feed(ME).await;
    let meta_before = app.stored_meta(ME).await;

    app.records
        .upsert(SourceRecord::Exercise(exercise("e1", "Handstand", None)));
    app.store.fail_writes.store(true, Ordering::SeqCst);

    match app.aggregator.refresh().await {
        RefreshOutcome::Failed(e) => assert_eq!(e.kind, ErrorKind::Storage),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(app.stored_feed(ME).await, feed_before);
    assert_eq!(app.stored_meta(ME).await, meta_before);
    assert_eq!(app.feed().len(), 1);

    app.store.fail_writes.store(false, Ordering::SeqCst);
    let summary = app.pass().await;
    assert_eq!(summary.new_items, 1);
    assert_eq!(app.feed().len(), 2);
}

#[tokio::test]
async fn test_read_failure_skips_pass() {
    let app = TestApp::new();
    app.records
        .replace(vec![SourceRecord::Exercise(exercise("e1", "Handstand", None))]);
    app.store.fail_reads.store(true, Ordering::SeqCst);

    assert!(matches!(
        app.aggregator.refresh().await,
        RefreshOutcome::Failed(_)
    ));
    assert!(app.store.inner.is_empty());
}

#[tokio::test]
async fn test_malformed_state_heals() {
    let app = TestApp::new();
    let user = UserId::new(ME);
    app.store
        .inner
        .set(&app.keys.feed(&user), "not json at all")
        .await
        .unwrap();
    app.store
        .inner
        .set(&app.keys.meta(&user), r#"{"signatures": 42}"#)
        .await
        .unwrap();
    app.records
        .replace(vec![SourceRecord::Exercise(exercise("e1", "Handstand", None))]);

    assert_eq!(app.pass().await.new_items, 1);

    let feed: serde_json::Value =
        serde_json::from_str(&app.stored_feed(ME).await.unwrap()).unwrap();
    assert_eq!(feed.as_array().map(Vec::len), Some(1));
    let meta: serde_json::Value =
        serde_json::from_str(&app.stored_meta(ME).await.unwrap()).unwrap();
    assert!(meta["signatures"].is_object());
    assert!(meta["seenStarts"].is_object());
    assert!(meta["lastStartCheck"].is_string());
}

#[tokio::test]
async fn test_own_records_hidden_by_default_for_announcements_only() {
    let app = TestApp::new();
    let mut own_announcement = announcement("a1", "Mein Aushang", "");
    own_announcement.author_id = Some(UserId::new(ME));
    let mut own_exercise = exercise("e1", "Meine Uebung", None);
    own_exercise.author_id = Some(UserId::new(ME));
    app.records.replace(vec![
        SourceRecord::Announcement(own_announcement),
        SourceRecord::Exercise(own_exercise),
    ]);

    let summary = app.pass().await;
    assert_eq!(summary.records_read.get(&SourceKind::Announcement), Some(&0));
    assert_eq!(summary.records_read.get(&SourceKind::Exercise), Some(&1));
    assert_eq!(app.feed()[0].category, FeedCategory::Exercise);
}

#[tokio::test]
async fn test_own_record_policy_is_configurable() {
    let mut settings = FeedConfig::default();
    settings.sources.for_kind_mut(SourceKind::Announcement).exclude_own = false;
    settings.sources.for_kind_mut(SourceKind::Exercise).exclude_own = true;
    let app = TestApp::with_settings(settings);

    let mut own_announcement = announcement("a1", "Mein Aushang", "");
    own_announcement.author_id = Some(UserId::new(ME));
    let mut own_exercise = exercise("e1", "Meine Uebung", None);
    own_exercise.author_id = Some(UserId::new(ME));
    app.records.replace(vec![
        SourceRecord::Announcement(own_announcement),
        SourceRecord::Exercise(own_exercise),
    ]);

    app.pass().await;
    let feed = app.feed();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].category, FeedCategory::Announcement);
}

#[tokio::test]
async fn test_disabled_source_is_not_read() {
    let mut settings = FeedConfig::default();
    settings.sources.for_kind_mut(SourceKind::Tasklist).enabled = false;
    let app = TestApp::with_settings(settings);
    app.records
        .replace(vec![SourceRecord::Tasklist(task("t1", "Trikots waschen", None))]);

    let summary = app.pass().await;
    assert!(!summary.records_read.contains_key(&SourceKind::Tasklist));
    assert!(app.feed().is_empty());
}

#[tokio::test]
async fn test_group_records_follow_role() {
    let app = TestApp::new();
    let mut other_group = assignment("as1", "Nur fuer g2", None);
    other_group.group_id = Some(GroupId::new("g2"));
    let mut own_group = assignment("as2", "Fuer g1", None);
    own_group.group_id = Some(GroupId::new("g1"));
    app.records.replace(vec![
        SourceRecord::Assignment(other_group),
        SourceRecord::Assignment(own_group),
    ]);

    app.pass().await;
    let ids: Vec<String> = app.feed().iter().map(|i| i.source_id.to_string()).collect();
    assert_eq!(ids, vec!["as2".to_string()]);

    app.session.switch(Some(session("coach", MemberRole::Teacher)));
    app.pass().await;
    assert_eq!(app.feed().len(), 2);
}

#[tokio::test]
async fn test_signed_out_pass_is_noop() {
    let app = TestApp::new();
    app.records
        .replace(vec![SourceRecord::Exercise(exercise("e1", "Handstand", None))]);
    app.session.switch(None);

    assert!(matches!(
        app.aggregator.refresh().await,
        RefreshOutcome::SignedOut
    ));
    assert!(app.store.inner.is_empty());
    assert!(app.feed().is_empty());
}

/// Record store that holds every query until the gate opens.
struct GatedRecords {
    inner: FixtureRecordStore,
    gate: watch::Sender<bool>,
}

#[async_trait]
impl RecordStore<SourceRecord> for GatedRecords {
    async fn query(&self, kind: SourceKind, filter: &ScopeFilter) -> AppResult<Vec<SourceRecord>> {
        let mut open = self.gate.subscribe();
        let _ = open.wait_for(|open| *open).await;
        self.inner.query(kind, filter).await
    }
}

#[tokio::test]
async fn test_trigger_during_pass_is_dropped() {
    let records = Arc::new(GatedRecords {
        inner: FixtureRecordStore::new(vec![SourceRecord::Exercise(exercise(
            "e1", "Handstand", None,
        ))]),
        gate: watch::Sender::new(false),
    });
    let aggregator = FeedAggregator::new(
        FeedConfig::default(),
        StateKeys::default(),
        Arc::new(clubfeed_store::memory::MemoryKvStore::new()),
        Arc::clone(&records) as _,
        Arc::new(helpers::TestSession::new(session(ME, MemberRole::Student))),
    );

    let (first, second) = tokio::join!(aggregator.refresh(), async {
        assert!(aggregator.is_busy());
        let second = aggregator.refresh().await;
        records.gate.send_replace(true);
        second
    });

    assert!(matches!(second, RefreshOutcome::Busy));
    assert_eq!(first.summary().map(|s| s.new_items), Some(1));
    assert!(!aggregator.is_busy());
}
