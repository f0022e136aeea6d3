//! Calendar entry record.

use serde::{Deserialize, Serialize};

use clubfeed_core::types::id::{GroupId, OrgId, RecordId, UserId};

use super::schedule::Schedule;

/// An entry in an organization calendar or the personal calendar.
///
/// Personal entries have no `org_id` and carry an `owner_id` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: RecordId,
    #[serde(default)]
    pub org_id: Option<OrgId>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub author_id: Option<UserId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub starts: Schedule,
    #[serde(default)]
    pub ends: Option<Schedule>,
}

impl CalendarEntry {
    pub(crate) fn signature_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            self.description.as_deref(),
            self.location.as_deref(),
            Some(self.starts.at.as_str()),
            super::schedule_field(&self.ends),
        ]
    }
}
