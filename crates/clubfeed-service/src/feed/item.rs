//! Building feed entries from source records.

use chrono::{DateTime, Utc};

use clubfeed_core::types::session::SessionContext;
use clubfeed_entity::notification::{FeedCategory, FeedEventType, NotificationItem, category_label};
use clubfeed_entity::record::{SourceRecord, start_iso};

use super::signature::PERSONAL_SCOPE;

/// Deterministic entry id: `category:eventType:scopeId:sourceId:stamp`.
///
/// The scope keeps same-id records of two organizations apart.
pub fn item_id(
    category: FeedCategory,
    event_type: FeedEventType,
    scope_id: Option<&str>,
    source_id: &str,
    stamp: &str,
) -> String {
    let scope = scope_id.unwrap_or(PERSONAL_SCOPE);
    format!("{category}:{event_type}:{scope}:{source_id}:{stamp}")
}

/// Summary line shown for an entry.
///
/// Announcements read "Aenderung" even when new.
pub fn change_text(category: FeedCategory, event_type: FeedEventType, title: &str) -> String {
    let prefix = match (category, event_type) {
        (_, FeedEventType::Start) => "Beginnt jetzt",
        (FeedCategory::Announcement, _) | (_, FeedEventType::Update) => "Aenderung",
        (_, FeedEventType::New) => "Neu",
    };
    format!("{prefix}: {}", title.trim())
}

/// Entry for a record seen for the first time or changed since last pass.
pub fn change_item(
    record: &SourceRecord,
    event_type: FeedEventType,
    fingerprint: &str,
    now: DateTime<Utc>,
    ctx: &SessionContext,
) -> NotificationItem {
    build(record, event_type, fingerprint, now, ctx)
}

/// Entry for a record whose start time just passed.
pub fn start_item(
    record: &SourceRecord,
    starts_at: DateTime<Utc>,
    ctx: &SessionContext,
) -> NotificationItem {
    build(record, FeedEventType::Start, &start_iso(starts_at), starts_at, ctx)
}

fn build(
    record: &SourceRecord,
    event_type: FeedEventType,
    stamp: &str,
    created_at: DateTime<Utc>,
    ctx: &SessionContext,
) -> NotificationItem {
    let category = record.kind();
    let org_id = record.org_id().cloned();
    let org_name = org_id
        .as_ref()
        .and_then(|id| ctx.org_name(id))
        .map(str::to_string);

    NotificationItem {
        id: item_id(
            category,
            event_type,
            org_id.as_ref().map(|id| id.as_str()),
            record.id().as_str(),
            stamp,
        ),
        created_at,
        org_id,
        org_name,
        category,
        category_label: category_label(category).to_string(),
        change_text: change_text(category, event_type, record.title()),
        source_id: record.id().clone(),
        event_type,
    }
}
