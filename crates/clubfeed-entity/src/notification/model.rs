//! Feed entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clubfeed_core::types::id::{OrgId, RecordId};

use super::category::FeedCategory;
use super::event_type::FeedEventType;

/// One entry of a user's news feed.
///
/// Serialized in camelCase; the persisted feed is a JSON array of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    /// Deterministic identity, unique within a feed.
    pub id: String,
    /// Emission time for new/update entries, scheduled start for start entries.
    pub created_at: DateTime<Utc>,
    /// Owning organization; `None` for the personal space.
    pub org_id: Option<OrgId>,
    /// Display name of the owning organization.
    pub org_name: Option<String>,
    /// Kind of record the entry is about.
    pub category: FeedCategory,
    /// Display label of the category.
    pub category_label: String,
    /// Summary of what happened.
    pub change_text: String,
    /// Id of the originating record.
    pub source_id: RecordId,
    /// What happened.
    pub event_type: FeedEventType,
}

impl NotificationItem {
    /// Whether the entry belongs to the personal space.
    pub fn is_personal(&self) -> bool {
        self.org_id.is_none()
    }
}
