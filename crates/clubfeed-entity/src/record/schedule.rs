//! Scheduling fields and how they are interpreted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Raw scheduling value as stored by the backend.
///
/// `at` is either a date (`2024-05-01`) or a timestamp. `has_time`, when
/// the backend provides it, overrides what the string looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Stored date or timestamp.
    pub at: String,
    /// Explicit time-of-day flag.
    #[serde(default)]
    pub has_time: Option<bool>,
}

/// Interpretation of a [`Schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAt {
    /// A point in time with an explicit clock time.
    Timed(DateTime<Utc>),
    /// A calendar day without time of day.
    DateOnly(NaiveDate),
    /// The stored value could not be parsed.
    Invalid,
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl Schedule {
    /// Creates a schedule from a stored value.
    pub fn new(at: impl Into<String>) -> Self {
        Self {
            at: at.into(),
            has_time: None,
        }
    }

    /// Creates a schedule with an explicit time-of-day flag.
    pub fn with_has_time(at: impl Into<String>, has_time: bool) -> Self {
        Self {
            at: at.into(),
            has_time: Some(has_time),
        }
    }

    /// Interpret the stored value.
    ///
    /// Timestamps without offset are read as UTC. A timestamp whose
    /// `has_time` flag is `false` counts as its date only.
    pub fn resolve(&self) -> ScheduledAt {
        let raw = self.at.trim();
        if raw.is_empty() {
            return ScheduledAt::Invalid;
        }

        let timed = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NAIVE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|naive| naive.and_utc())
            });

        match (timed, self.has_time) {
            (Some(dt), Some(false)) => ScheduledAt::DateOnly(dt.date_naive()),
            (Some(dt), _) => ScheduledAt::Timed(dt),
            (None, _) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => ScheduledAt::DateOnly(date),
                Err(_) => ScheduledAt::Invalid,
            },
        }
    }
}

/// Canonical ISO form of a start instant, used in keys and ids.
pub fn start_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
