//! Integration tests for start-event detection across passes.

mod helpers;

use chrono::Duration;

use clubfeed_core::types::kind::SourceKind;

use clubfeed_entity::notification::{FeedCategory, FeedEventType, NotificationItem};
use clubfeed_entity::record::{Schedule, SourceRecord};
use clubfeed_entity::watermark::WatermarkStore;

use helpers::*;

fn starts(feed: &[NotificationItem]) -> Vec<&NotificationItem> {
    feed.iter()
        .filter(|i| i.event_type == FeedEventType::Start)
        .collect()
}

async fn watermark(app: &TestApp) -> WatermarkStore {
    serde_json::from_str(&app.stored_meta(ME).await.unwrap()).unwrap()
}

#[tokio::test]
async fn test_start_fires_once() {
    let app = TestApp::new();
    app.records.replace(vec![SourceRecord::Assignment(assignment(
        "as1",
        "Bericht",
        Some("2024-05-01T11:55:00Z"),
    ))]);

    let first = app.pass().await;
    assert_eq!(first.new_items, 1);
    assert_eq!(first.started_items, 1);

    let feed = app.feed();
    let started = starts(&feed);
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].id, "assignment:start:tv-musterstadt:as1:2024-05-01T11:55:00.000Z");
    assert_eq!(started[0].created_at, at(11, 55));
    assert_eq!(started[0].change_text, "Beginnt jetzt: Bericht");
    assert_eq!(feed[0].event_type, FeedEventType::New);

    for minutes in [0, 3, 20] {
        app.clock.advance(Duration::minutes(minutes));
        assert_eq!(app.pass().await.started_items, 0);
    }
    assert_eq!(starts(&app.feed()).len(), 1);
}

#[tokio::test]
async fn test_recent_start_within_ten_minutes_fires() {
    for offset in [0, 1, 9, 10] {
        let app = TestApp::new();
        let due = (at(12, 0) - Duration::minutes(offset)).to_rfc3339();
        app.records.replace(vec![SourceRecord::Exercise(exercise(
            "e1",
            "Handstand",
            Some(&due),
        ))]);
        assert_eq!(app.pass().await.started_items, 1, "offset {offset}");
    }
}

#[tokio::test]
async fn test_date_only_never_fires() {
    let app = TestApp::new();
    app.records.replace(vec![
        SourceRecord::Event(event("ev1", "Sommerfest", Schedule::new("2024-05-01"))),
        SourceRecord::Event(event(
            "ev2",
            "Jahresversammlung",
            Schedule::with_has_time("2024-05-01T12:00:00Z", false),
        )),
        SourceRecord::Tasklist(task("t1", "Kuchen backen", Some("2024-05-01"))),
    ]);

    app.clock.set(at(0, 0));
    for _ in 0..6 {
        let summary = app.pass().await;
        assert_eq!(summary.started_items, 0);
        app.clock.advance(Duration::hours(4));
    }
    assert!(starts(&app.feed()).is_empty());
    assert!(watermark(&app).await.seen_starts.is_empty());
}

#[tokio::test]
async fn test_stale_device_skips_backlog() {
    let app = TestApp::new();
    app.pass().await;

    app.records.replace(vec![
        SourceRecord::Assignment(assignment("old", "Laengst vorbei", Some("2024-05-01T13:00:00Z"))),
        SourceRecord::Assignment(assignment("fresh", "Gerade eben", Some("2024-05-01T17:50:00Z"))),
    ]);
    app.clock.set(at(18, 0));

    let summary = app.pass().await;
    assert_eq!(summary.new_items, 2);
    assert_eq!(summary.started_items, 1);
    let feed = app.feed();
    let started = starts(&feed);
    assert_eq!(started[0].source_id.as_str(), "fresh");
}

#[tokio::test]
async fn test_future_start_fires_when_due() {
    let app = TestApp::new();
    app.records.replace(vec![SourceRecord::Event(event(
        "ev1",
        "Turnier",
        Schedule::new("2024-05-01T12:10:00+00:00"),
    ))]);

    assert_eq!(app.pass().await.started_items, 0);

    app.clock.set(at(12, 8));
    assert_eq!(app.pass().await.started_items, 0);

    app.clock.set(at(12, 12));
    assert_eq!(app.pass().await.started_items, 1);

    app.clock.set(at(12, 20));
    assert_eq!(app.pass().await.started_items, 0);

    let feed = app.feed();
    let started = starts(&feed);
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].category, FeedCategory::Event);
    assert_eq!(started[0].created_at, at(12, 10));
    assert_eq!(feed[0].id, started[0].id);
}

#[tokio::test]
async fn test_window_is_anchored_at_last_check() {
    let app = TestApp::new();
    app.pass().await;

    app.records.replace(vec![
        SourceRecord::Assignment(assignment("before", "Vor dem Check", Some("2024-05-01T11:59:00Z"))),
        SourceRecord::Assignment(assignment("after", "Nach dem Check", Some("2024-05-01T12:03:00Z"))),
    ]);
    app.clock.set(at(12, 5));

    let feed_summary = app.pass().await;
    assert_eq!(feed_summary.started_items, 1);
    let feed = app.feed();
    assert_eq!(starts(&feed)[0].source_id.as_str(), "after");
    assert_eq!(watermark(&app).await.last_start_check, Some(at(12, 5)));
}

#[tokio::test]
async fn test_same_id_in_two_kinds_fires_independently() {
    let app = TestApp::new();
    app.records.replace(vec![
        SourceRecord::Assignment(assignment("x", "Abgabe", Some("2024-05-01T11:58:00Z"))),
        SourceRecord::Tasklist(task("x", "Abgabe vorbereiten", Some("2024-05-01T11:58:00Z"))),
    ]);

    let summary = app.pass().await;
    assert_eq!(summary.started_items, 2);
    let feed = app.feed();
    let mut categories: Vec<FeedCategory> = starts(&feed).iter().map(|i| i.category).collect();
    categories.sort();
    assert_eq!(categories, vec![FeedCategory::Assignment, FeedCategory::Tasklist]);
}

#[tokio::test]
async fn test_unparsable_schedule_still_reports_changes() {
    let app = TestApp::new();
    app.records.replace(vec![SourceRecord::Exercise(exercise(
        "e1",
        "Handstand",
        Some("irgendwann"),
    ))]);

    let summary = app.pass().await;
    assert_eq!(summary.new_items, 1);
    assert_eq!(summary.started_items, 0);
}

#[tokio::test]
async fn test_expired_starts_are_pruned() {
    let app = TestApp::new();
    app.records.replace(vec![SourceRecord::Assignment(assignment(
        "as1",
        "Bericht",
        Some("2024-05-01T11:55:00Z"),
    ))]);

    app.pass().await;
    assert_eq!(watermark(&app).await.seen_starts.len(), 1);

    app.clock.set(at(12, 30));
    let summary = app.pass().await;
    assert_eq!(summary.pruned_starts, 1);
    assert_eq!(summary.started_items, 0);
    assert!(watermark(&app).await.seen_starts.is_empty());
}

#[tokio::test]
async fn test_rescheduled_item_fires_again() {
    let app = TestApp::new();
    let mut record = assignment("as1", "Bericht", Some("2024-05-01T11:55:00Z"));
    app.records.replace(vec![SourceRecord::Assignment(record.clone())]);
    app.pass().await;

    record.due = Some(Schedule::new("2024-05-01T12:10:00Z"));
    app.records.replace(vec![SourceRecord::Assignment(record)]);
    app.clock.set(at(12, 11));

    let summary = app.pass().await;
    assert_eq!(summary.updated_items, 1);
    assert_eq!(summary.started_items, 1);
    assert_eq!(starts(&app.feed()).len(), 2);
}

#[tokio::test]
async fn test_start_during_source_outage_fires_when_source_returns() {
    let app = TestApp::new();
    app.records.replace(vec![
        SourceRecord::Exercise(exercise("e1", "Handstand", Some("2024-05-01T12:03:00Z"))),
        SourceRecord::Assignment(assignment("as1", "Bericht", Some("2024-05-01T12:04:00Z"))),
    ]);
    assert_eq!(app.pass().await.new_items, 2);

    app.records.set_unavailable(SourceKind::Exercise, true);
    app.clock.set(at(12, 5));
    let outage = app.pass().await;
    assert_eq!(outage.failed_sources, vec![SourceKind::Exercise]);
    assert_eq!(outage.started_items, 1);
    assert_eq!(watermark(&app).await.last_start_check, Some(at(12, 0)));

    app.records.set_unavailable(SourceKind::Exercise, false);
    app.clock.set(at(12, 6));
    let recovered = app.pass().await;
    assert_eq!(recovered.started_items, 1);
    assert_eq!(watermark(&app).await.last_start_check, Some(at(12, 6)));

    let feed = app.feed();
    let mut started: Vec<&str> = starts(&feed).iter().map(|i| i.source_id.as_str()).collect();
    started.sort();
    assert_eq!(started, vec!["as1", "e1"]);
}
