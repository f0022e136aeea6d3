//! Announcement record.

use serde::{Deserialize, Serialize};

use clubfeed_core::types::id::{GroupId, OrgId, RecordId, UserId};

use super::schedule::Schedule;

/// A post to an organization, optionally restricted to one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: RecordId,
    #[serde(default)]
    pub org_id: Option<OrgId>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub author_id: Option<UserId>,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Day (or time) the announced event happens.
    #[serde(default)]
    pub event_date: Option<Schedule>,
}

impl Announcement {
    pub(crate) fn signature_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            self.body.as_deref(),
            super::schedule_field(&self.event_date),
        ]
    }
}
