//! What happened to the record behind a feed entry.

use serde::{Deserialize, Serialize};

/// Event that produced a feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedEventType {
    /// The record was seen for the first time.
    New,
    /// The record's content changed since the last pass.
    Update,
    /// The record's scheduled start entered the start window.
    Start,
}

impl FeedEventType {
    /// Return the event type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Update => "update",
            Self::Start => "start",
        }
    }
}

impl std::fmt::Display for FeedEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
