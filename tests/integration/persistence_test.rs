//! Integration tests for persisted state: restarts, account switching,
//! reset, and the file-backed setup used by the daemon.

mod helpers;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;

use clubfeed_core::config::AppConfig;
use clubfeed_core::error::ErrorKind;
use clubfeed_core::traits::session::StaticSession;
use clubfeed_core::types::session::MemberRole;
use clubfeed_entity::notification::FeedEventType;
use clubfeed_entity::record::SourceRecord;
use clubfeed_service::{AppContext, RefreshOutcome};

use helpers::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "clubfeed-persistence-{}-{name}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn test_state_is_keyed_per_user() {
    let app = TestApp::new();
    app.records
        .replace(vec![SourceRecord::Exercise(exercise("e1", "Handstand", None))]);
    app.pass().await;

    assert!(app.store.inner.len() == 2);
    assert!(app.stored_feed(ME).await.is_some());
    assert!(app.stored_meta(ME).await.is_some());
    assert!(app.stored_feed("someone-else").await.is_none());
}

#[tokio::test]
async fn test_restart_loads_last_feed_without_renotifying() {
    let first = TestApp::new();
    first
        .records
        .replace(vec![SourceRecord::Exercise(exercise("e1", "Handstand", None))]);
    first.pass().await;

    let restarted = TestApp::with_store(Arc::clone(&first.store));
    restarted
        .records
        .replace(vec![SourceRecord::Exercise(exercise("e1", "Handstand", None))]);

    assert!(restarted.feed().is_empty());
    assert_eq!(restarted.aggregator.load().await.unwrap(), 1);
    assert_eq!(restarted.feed(), first.feed());

    restarted.clock.advance(Duration::minutes(5));
    assert_eq!(restarted.pass().await.emitted(), 0);
}

#[tokio::test]
async fn test_account_switch_starts_clean() {
    let app = TestApp::new();
    app.records.replace(vec![
        SourceRecord::Announcement(announcement("a1", "Training", "18:00 Uhr")),
        SourceRecord::Tasklist(task("t1", "Trikots waschen", None)),
    ]);
    app.pass().await;
    let my_feed = app.feed();
    assert_eq!(my_feed.len(), 2);

    app.session.switch(Some(session("partner", MemberRole::Student)));
    let summary = app.pass().await;
    assert_eq!(summary.user_id.as_ref().map(|u| u.as_str()), Some("partner"));
    assert_eq!(summary.new_items, 1);
    assert_eq!(app.aggregator.snapshot_user().unwrap().as_str(), "partner");
    assert_eq!(app.feed().len(), 1);

    app.session.switch(Some(session(ME, MemberRole::Student)));
    let summary = app.pass().await;
    assert_eq!(summary.emitted(), 0);
    assert_eq!(app.feed(), my_feed);
}

#[tokio::test]
async fn test_switch_shows_stored_feed_even_if_pass_fails() {
    let app = TestApp::new();
    app.records
        .replace(vec![SourceRecord::Exercise(exercise("e1", "Handstand", None))]);
    app.pass().await;
    let my_feed = app.feed();

    app.session.switch(Some(session("partner", MemberRole::Student)));
    app.pass().await;

    app.store
        .fail_writes
        .store(true, std::sync::atomic::Ordering::SeqCst);
    app.session.switch(Some(session(ME, MemberRole::Student)));
    app.records
        .upsert(SourceRecord::Exercise(exercise("e2", "Radwende", None)));

    assert!(matches!(
        app.aggregator.refresh().await,
        RefreshOutcome::Failed(_)
    ));
    assert_eq!(app.feed(), my_feed);
}

#[tokio::test]
async fn test_reset_renotifies_everything() {
    let app = TestApp::new();
    app.records.replace(vec![
        SourceRecord::Exercise(exercise("e1", "Handstand", None)),
        SourceRecord::Tasklist(task("t1", "Trikots waschen", None)),
    ]);
    app.pass().await;
    assert_eq!(app.pass().await.emitted(), 0);

    let user = app.aggregator.reset().await.unwrap();
    assert_eq!(user.as_str(), ME);
    assert!(app.store.inner.is_empty());
    assert!(app.feed().is_empty());

    let summary = app.pass().await;
    assert_eq!(summary.new_items, 2);
    assert!(app.feed().iter().all(|i| i.event_type == FeedEventType::New));
}

#[tokio::test]
async fn test_reset_requires_session() {
    let app = TestApp::new();
    app.session.switch(None);
    let err = app.aggregator.reset().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Session);
}

#[tokio::test]
async fn test_file_backed_context_survives_restart() {
    let dir = scratch_dir("context");
    let fixture = dir.join("records.json");
    let records = vec![
        SourceRecord::Announcement(announcement("a1", "Training", "18:00 Uhr")),
        SourceRecord::Tasklist(task("t1", "Trikots waschen", None)),
    ];
    std::fs::write(&fixture, serde_json::to_string(&records).unwrap()).unwrap();

    let mut config = AppConfig::default();
    config.store.provider = "file".to_string();
    config.store.path = dir.join("state.json").to_string_lossy().into_owned();
    config.records.fixture_path = Some(fixture.to_string_lossy().into_owned());
    let user = session(ME, MemberRole::Student);

    let ctx = AppContext::build(config.clone(), Arc::new(StaticSession(user.clone())))
        .await
        .unwrap();
    let summary = ctx.aggregator.refresh().await;
    assert_eq!(summary.summary().map(|s| s.new_items), Some(2));
    drop(ctx);

    let reopened = AppContext::build(config, Arc::new(StaticSession(user)))
        .await
        .unwrap();
    assert_eq!(reopened.aggregator.load().await.unwrap(), 2);
    assert_eq!(
        reopened.aggregator.refresh().await.summary().map(|s| s.emitted()),
        Some(0)
    );

    let _ = std::fs::remove_dir_all(&dir);
}
