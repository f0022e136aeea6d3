//! Assignment record.

use serde::{Deserialize, Serialize};

use clubfeed_core::types::id::{GroupId, OrgId, RecordId, UserId};

use super::schedule::Schedule;

/// Work handed out to a group, usually with a due time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: RecordId,
    #[serde(default)]
    pub org_id: Option<OrgId>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub author_id: Option<UserId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due: Option<Schedule>,
}

impl Assignment {
    pub(crate) fn signature_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            self.description.as_deref(),
            super::schedule_field(&self.due),
        ]
    }
}
