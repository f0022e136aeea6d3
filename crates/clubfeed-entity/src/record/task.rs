//! Personal task-list entry.

use serde::{Deserialize, Serialize};

use clubfeed_core::types::id::{RecordId, UserId};

use super::schedule::Schedule;

/// A task on one of the user's personal lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListTask {
    pub id: RecordId,
    pub owner_id: UserId,
    #[serde(default)]
    pub list_name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub due: Option<Schedule>,
    #[serde(default)]
    pub done: bool,
}

impl TaskListTask {
    pub(crate) fn signature_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            self.notes.as_deref(),
            super::schedule_field(&self.due),
            Some(if self.done { "done" } else { "open" }),
        ]
    }
}
