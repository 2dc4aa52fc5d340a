//! Storage trait backing every QuerySet

use crate::core::error::StorageError;
use crate::core::query::{Constraints, Query};
use crate::core::record::Record;
use async_trait::async_trait;

/// Storage trait for the records of a single model
///
/// Implementations execute [`Query`] descriptions. The lookup layer is
/// agnostic to the underlying storage mechanism; it never opens or commits
/// transactions itself.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Persist a new record, assigning its primary key if it has none
    async fn create(&self, record: R) -> Result<R, StorageError>;

    /// Records matching `query`, in storage order, up to `limit`
    async fn fetch(&self, query: &Query, limit: Option<usize>) -> Result<Vec<R>, StorageError>;

    /// Number of records matching `query`
    async fn count(&self, query: &Query) -> Result<usize, StorageError>;

    /// Apply `changes` to every record matching `query`, returning how many were written
    async fn update(&self, query: &Query, changes: &Constraints) -> Result<usize, StorageError>;
}
