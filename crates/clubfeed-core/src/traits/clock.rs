//! Wall clock abstraction.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait ClockFn: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct Now;

impl ClockFn for Now {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
