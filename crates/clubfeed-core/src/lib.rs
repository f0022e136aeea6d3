//! # clubfeed-core
//!
//! Core crate for ClubFeed. Contains the collaborator traits the
//! aggregator talks through (key-value persistence, record queries,
//! session lookup, clock), configuration schemas, typed identifiers,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other ClubFeed crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
