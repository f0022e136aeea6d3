//! Queryable record store trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::kind::SourceKind;
use crate::types::scope::ScopeFilter;

/// Read access to the hosted backend's records.
///
/// Generic over the record type so that the entity crate can define the
/// concrete record shapes. A failed query surfaces as an `Err` value; it
/// never affects queries for other kinds.
#[async_trait]
pub trait RecordStore<Record>: Send + Sync + 'static
where
    Record: Send + Sync + 'static,
{
    /// Fetch every record of `kind` inside `filter`.
    async fn query(&self, kind: SourceKind, filter: &ScopeFilter) -> AppResult<Vec<Record>>;
}
