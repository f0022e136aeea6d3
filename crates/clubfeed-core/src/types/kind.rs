//! The closed set of record kinds the feed is built from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of source record. Each kind has its own reader and its own
/// settings block in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Organization or group announcements.
    Announcement,
    /// Assignments handed out to a group.
    Assignment,
    /// Training exercises.
    Exercise,
    /// Tasks on the user's personal task lists.
    Tasklist,
    /// Calendar entries.
    Event,
}

impl SourceKind {
    /// Every kind, in reader dispatch order.
    pub const ALL: [SourceKind; 5] = [
        Self::Announcement,
        Self::Assignment,
        Self::Exercise,
        Self::Tasklist,
        Self::Event,
    ];

    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Announcement => "announcement",
            Self::Assignment => "assignment",
            Self::Exercise => "exercise",
            Self::Tasklist => "tasklist",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "announcement" => Ok(Self::Announcement),
            "assignment" => Ok(Self::Assignment),
            "exercise" => Ok(Self::Exercise),
            "tasklist" => Ok(Self::Tasklist),
            "event" => Ok(Self::Event),
            other => Err(format!("unknown source kind: '{other}'")),
        }
    }
}
