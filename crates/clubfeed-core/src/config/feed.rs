//! Feed aggregation configuration.

use serde::{Deserialize, Serialize};

use crate::types::kind::SourceKind;

/// Feed aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Maximum number of persisted feed entries.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Length of the trailing start-event window, in minutes.
    #[serde(default = "default_window")]
    pub start_window_minutes: i64,
    /// Per-kind reader settings.
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            start_window_minutes: default_window(),
            sources: SourcesConfig::default(),
        }
    }
}

/// Reader settings for one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Whether the kind is read at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether records authored by the current user are skipped.
    #[serde(default)]
    pub exclude_own: bool,
}

impl SourceSettings {
    const fn new(exclude_own: bool) -> Self {
        Self {
            enabled: true,
            exclude_own,
        }
    }
}

/// Reader settings for every record kind.
///
/// Own records are hidden for announcements and assignments only; the
/// other kinds show them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "own_hidden")]
    pub announcement: SourceSettings,
    #[serde(default = "own_hidden")]
    pub assignment: SourceSettings,
    #[serde(default = "own_shown")]
    pub exercise: SourceSettings,
    #[serde(default = "own_shown")]
    pub tasklist: SourceSettings,
    #[serde(default = "own_shown")]
    pub event: SourceSettings,
}

impl SourcesConfig {
    /// Settings for one kind.
    pub fn for_kind(&self, kind: SourceKind) -> SourceSettings {
        match kind {
            SourceKind::Announcement => self.announcement,
            SourceKind::Assignment => self.assignment,
            SourceKind::Exercise => self.exercise,
            SourceKind::Tasklist => self.tasklist,
            SourceKind::Event => self.event,
        }
    }

    /// Mutable settings for one kind.
    pub fn for_kind_mut(&mut self, kind: SourceKind) -> &mut SourceSettings {
        match kind {
            SourceKind::Announcement => &mut self.announcement,
            SourceKind::Assignment => &mut self.assignment,
            SourceKind::Exercise => &mut self.exercise,
            SourceKind::Tasklist => &mut self.tasklist,
            SourceKind::Event => &mut self.event,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            announcement: own_hidden(),
            assignment: own_hidden(),
            exercise: own_shown(),
            tasklist: own_shown(),
            event: own_shown(),
        }
    }
}

fn own_hidden() -> SourceSettings {
    SourceSettings::new(true)
}

fn own_shown() -> SourceSettings {
    SourceSettings::new(false)
}

fn default_max_items() -> usize {
    200
}

fn default_window() -> i64 {
    15
}

fn default_true() -> bool {
    true
}
