//! Feed entries.

pub mod category;
pub mod event_type;
pub mod model;

pub use category::{FeedCategory, category_label};
pub use event_type::FeedEventType;
pub use model::NotificationItem;
