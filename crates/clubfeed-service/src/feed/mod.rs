//! Feed aggregation pipeline.
//!
//! Leaves first: [`signature`] and [`start`] are pure functions over the
//! watermark, [`sources`] reads and scopes records, [`item`] builds feed
//! entries, [`merge`] folds them into the stored feed, [`state`] loads
//! and persists, and [`aggregator`] runs the pass.

pub mod aggregator;
pub mod item;
pub mod merge;
pub mod signature;
pub mod sources;
pub mod start;
pub mod state;
