//! Source records, one variant per kind.

pub mod announcement;
pub mod assignment;
pub mod calendar;
pub mod exercise;
pub mod schedule;
pub mod task;

use serde::{Deserialize, Serialize};

use clubfeed_core::types::id::{GroupId, OrgId, RecordId, UserId};
use clubfeed_core::types::kind::SourceKind;

pub use announcement::Announcement;
pub use assignment::Assignment;
pub use calendar::CalendarEntry;
pub use exercise::Exercise;
pub use schedule::{Schedule, ScheduledAt, start_iso};
pub use task::TaskListTask;

/// A record read from the hosted backend.
///
/// The aggregator treats every variant the same way through the
/// accessors below; only [`SourceRecord::signature_fields`] and
/// [`SourceRecord::schedule`] differ per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceRecord {
    Announcement(Announcement),
    Assignment(Assignment),
    Exercise(Exercise),
    Tasklist(TaskListTask),
    Event(CalendarEntry),
}

impl SourceRecord {
    /// Kind of the record.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Announcement(_) => SourceKind::Announcement,
            Self::Assignment(_) => SourceKind::Assignment,
            Self::Exercise(_) => SourceKind::Exercise,
            Self::Tasklist(_) => SourceKind::Tasklist,
            Self::Event(_) => SourceKind::Event,
        }
    }

    /// Id of the record.
    pub fn id(&self) -> &RecordId {
        match self {
            Self::Announcement(r) => &r.id,
            Self::Assignment(r) => &r.id,
            Self::Exercise(r) => &r.id,
            Self::Tasklist(r) => &r.id,
            Self::Event(r) => &r.id,
        }
    }

    /// Human title.
    pub fn title(&self) -> &str {
        match self {
            Self::Announcement(r) => &r.title,
            Self::Assignment(r) => &r.title,
            Self::Exercise(r) => &r.title,
            Self::Tasklist(r) => &r.title,
            Self::Event(r) => &r.title,
        }
    }

    /// Owning organization; `None` means personal space.
    pub fn org_id(&self) -> Option<&OrgId> {
        match self {
            Self::Announcement(r) => r.org_id.as_ref(),
            Self::Assignment(r) => r.org_id.as_ref(),
            Self::Exercise(r) => r.org_id.as_ref(),
            Self::Tasklist(_) => None,
            Self::Event(r) => r.org_id.as_ref(),
        }
    }

    /// Group the record is restricted to, if any.
    pub fn group_id(&self) -> Option<&GroupId> {
        match self {
            Self::Announcement(r) => r.group_id.as_ref(),
            Self::Assignment(r) => r.group_id.as_ref(),
            Self::Exercise(r) => r.group_id.as_ref(),
            Self::Tasklist(_) => None,
            Self::Event(r) => r.group_id.as_ref(),
        }
    }

    /// Author of the record.
    pub fn author_id(&self) -> Option<&UserId> {
        match self {
            Self::Announcement(r) => r.author_id.as_ref(),
            Self::Assignment(r) => r.author_id.as_ref(),
            Self::Exercise(r) => r.author_id.as_ref(),
            Self::Tasklist(r) => Some(&r.owner_id),
            Self::Event(r) => r.author_id.as_ref(),
        }
    }

    /// Owner of a personal-space record.
    pub fn owner_id(&self) -> Option<&UserId> {
        match self {
            Self::Tasklist(r) => Some(&r.owner_id),
            Self::Event(r) => r.owner_id.as_ref(),
            _ => None,
        }
    }

    /// The ordered fields whose content defines the record's fingerprint.
    pub fn signature_fields(&self) -> Vec<Option<&str>> {
        match self {
            Self::Announcement(r) => r.signature_fields(),
            Self::Assignment(r) => r.signature_fields(),
            Self::Exercise(r) => r.signature_fields(),
            Self::Tasklist(r) => r.signature_fields(),
            Self::Event(r) => r.signature_fields(),
        }
    }

    /// The scheduled start (or due time) of the record, if it has one.
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            Self::Announcement(r) => r.event_date.as_ref(),
            Self::Assignment(r) => r.due.as_ref(),
            Self::Exercise(r) => r.scheduled.as_ref(),
            Self::Tasklist(r) => r.due.as_ref(),
            Self::Event(r) => Some(&r.starts),
        }
    }
}

/// Raw string of an optional schedule, for fingerprinting.
pub(crate) fn schedule_field(schedule: &Option<Schedule>) -> Option<&str> {
    schedule.as_ref().map(|s| s.at.as_str())
}
