//! # clubfeed-store
//!
//! Implementations of the collaborator interfaces the aggregator talks to:
//!
//! - **memory**: process-local key-value store, for tests and ephemeral runs
//! - **file**: key-value store persisted to one JSON file, written atomically
//! - **records**: a record store serving source records from a JSON fixture
//!
//! The key-value backend is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
pub mod records;

pub use keys::StateKeys;
pub use provider::StoreManager;
pub use records::FixtureRecordStore;
