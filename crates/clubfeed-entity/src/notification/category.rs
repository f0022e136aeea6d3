//! Feed categories.
//!
//! A feed entry's category is the kind of record it came from, so the
//! category set is the record kind set.

pub use clubfeed_core::types::kind::SourceKind as FeedCategory;

/// Human-readable label shown next to a feed entry.
pub fn category_label(category: FeedCategory) -> &'static str {
    match category {
        FeedCategory::Announcement => "Ankuendigung",
        FeedCategory::Assignment => "Aufgabe",
        FeedCategory::Exercise => "Uebung",
        FeedCategory::Tasklist => "Aufgabenliste",
        FeedCategory::Event => "Termin",
    }
}
