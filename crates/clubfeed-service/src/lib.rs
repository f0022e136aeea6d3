//! # clubfeed-service
//!
//! The news feed aggregator. One pass reads every record source, detects
//! what changed since the user's watermark, fires start events for items
//! whose start time just passed, merges the results into the persisted
//! feed, and writes feed and watermark back together.
//!
//! Entry point is [`FeedAggregator`]; [`AppContext`] wires it from
//! configuration.

pub mod bootstrap;
pub mod feed;

pub use bootstrap::AppContext;
pub use feed::aggregator::{FeedAggregator, PassSummary, RefreshOutcome};
