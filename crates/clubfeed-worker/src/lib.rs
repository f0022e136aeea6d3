//! Background refresh triggers for ClubFeed.
//!
//! The aggregator only runs when something calls `refresh()`. This crate
//! provides the periodic trigger used by the daemon; overlapping triggers
//! are dropped by the aggregator's busy guard.

pub mod scheduler;

pub use scheduler::RefreshScheduler;
