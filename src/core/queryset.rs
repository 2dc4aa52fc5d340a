//! Lazy, chainable record collections

use crate::core::error::{LookupError, StorageError};
use crate::core::query::{Constraints, Query};
use crate::core::record::Record;
use crate::core::store::RecordStore;
use std::fmt;
use std::sync::Arc;

/// Rows fetched by [`QuerySet::get`]; two are enough to detect ambiguity
const GET_LIMIT: usize = 2;

/// A lazily evaluated collection of records of one model
///
/// Chaining (`filter`, `exclude`) only builds up a [`Query`]; nothing hits
/// the store until `count`, `get`, `fetch`, `exists` or `update` is awaited.
/// Cloning is cheap: the store is shared behind an `Arc`.
pub struct QuerySet<R: Record> {
    store: Arc<dyn RecordStore<R>>,
    query: Query,
}

impl<R: Record> Clone for QuerySet<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            query: self.query.clone(),
        }
    }
}

impl<R: Record> fmt::Debug for QuerySet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySet")
            .field("model", &R::model_name())
            .field("query", &self.query)
            .finish()
    }
}

impl<R: Record> QuerySet<R> {
    /// Every record in `store`
    pub fn all(store: Arc<dyn RecordStore<R>>) -> Self {
        Self {
            store,
            query: Query::new(),
        }
    }

    /// Query accumulated so far
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Narrow to records matching every constraint
    pub fn filter(mut self, constraints: Constraints) -> Self {
        if !constraints.is_empty() {
            self.query.filters.push(constraints);
        }
        self
    }

    /// Drop records matching every constraint
    pub fn exclude(mut self, constraints: Constraints) -> Self {
        if !constraints.is_empty() {
            self.query.excludes.push(constraints);
        }
        self
    }

    pub async fn count(&self) -> Result<usize, StorageError> {
        self.store.count(&self.query).await
    }

    pub async fn exists(&self) -> Result<bool, StorageError> {
        Ok(!self.store.fetch(&self.query, Some(1)).await?.is_empty())
    }

    pub async fn fetch(&self) -> Result<Vec<R>, StorageError> {
        self.store.fetch(&self.query, None).await
    }

    /// The single record matching the query plus `constraints`
    ///
    /// # Errors
    /// [`LookupError::DoesNotExist`] when nothing matches and
    /// [`LookupError::MultipleObjectsReturned`] when more than one record does.
    pub async fn get(&self, constraints: Constraints) -> Result<R, LookupError> {
        let narrowed = self.clone().filter(constraints);
        let mut rows = self.store.fetch(&narrowed.query, Some(GET_LIMIT)).await?;
        match rows.len() {
            0 => Err(LookupError::DoesNotExist {
                model: R::model_name().to_string(),
            }),
            1 => Ok(rows.remove(0)),
            _ => Err(LookupError::MultipleObjectsReturned {
                model: R::model_name().to_string(),
                count: narrowed.count().await?,
            }),
        }
    }

    /// Write `changes` to every matching record
    pub async fn update(&self, changes: &Constraints) -> Result<usize, StorageError> {
        self.store.update(&self.query, changes).await
    }
}
