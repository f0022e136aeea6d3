//! File-backed key-value store.

pub mod store;

pub use store::FileKvStore;
