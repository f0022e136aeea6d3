//! # clubfeed-entity
//!
//! Domain entity models for ClubFeed. Source records are what the hosted
//! backend returns; feed items and the watermark are what the aggregator
//! persists per user. Everything derives `Serialize`/`Deserialize` and
//! round-trips through the JSON layout stored in the key-value store.

pub mod notification;
pub mod record;
pub mod watermark;

pub use notification::{FeedCategory, FeedEventType, NotificationItem};
pub use record::{
    Announcement, Assignment, CalendarEntry, Exercise, Schedule, ScheduledAt, SourceRecord,
    TaskListTask,
};
pub use watermark::WatermarkStore;
