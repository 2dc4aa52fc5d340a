//! In-memory implementation of RecordStore for testing and development

use crate::core::error::StorageError;
use crate::core::field::FieldValue;
use crate::core::query::{Constraints, Query};
use crate::core::record::Record;
use crate::core::store::RecordStore;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

struct Table<R> {
    rows: Vec<R>,
    next_pk: i64,
}

/// In-memory record store
///
/// Keeps rows in insertion order and hands out auto-incrementing integer
/// primary keys (starting at 1) to records created without one. Unique
/// fields declared by the model are enforced on create and update.
/// Uses RwLock for thread-safe access.
pub struct InMemoryRecordStore<R: Record> {
    table: Arc<RwLock<Table<R>>>,
}

impl<R: Record> Clone for InMemoryRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<R: Record> InMemoryRecordStore<R> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                rows: Vec::new(),
                next_pk: 1,
            })),
        }
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Next free primary key once `pk` is taken
fn pk_after<R: Record>(pk: i64) -> Result<i64, StorageError> {
    pk.checked_add(1).ok_or_else(|| StorageError::KeyOverflow {
        model: R::model_name().to_string(),
        pk,
    })
}

/// Reject `candidate` if it collides with another row on the pk or a unique field.
/// `skip` is the index of the row being rewritten, if any.
fn check_unique<R: Record>(
    rows: &[R],
    candidate: &R,
    skip: Option<usize>,
) -> Result<(), StorageError> {
    let fields = std::iter::once(R::pk_field()).chain(R::unique_fields().iter().copied());
    for field in fields {
        let value = candidate.field_value(field).unwrap_or(FieldValue::Null);
        // NULLs never collide
        if value.is_null() {
            continue;
        }
        let clash = rows.iter().enumerate().any(|(index, row)| {
            Some(index) != skip
                && row
                    .field_value(field)
                    .is_some_and(|existing| existing.lookup_eq(&value))
        });
        if clash {
            return Err(StorageError::UniqueViolation {
                model: R::model_name().to_string(),
                field: field.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    async fn create(&self, mut record: R) -> Result<R, StorageError> {
        let mut table = self
            .table
            .write()
            .map_err(|_| StorageError::Lock("write"))?;

        if record.pk().is_null() {
            record.set_field(R::pk_field(), FieldValue::Integer(table.next_pk))?;
        }
        check_unique(&table.rows, &record, None)?;

        if let Some(pk) = record.pk().as_integer() {
            table.next_pk = table.next_pk.max(pk_after::<R>(pk)?);
        }
        table.rows.push(record.clone());

        tracing::trace!(model = R::model_name(), pk = %record.pk(), "record created");
        Ok(record)
    }

    async fn fetch(&self, query: &Query, limit: Option<usize>) -> Result<Vec<R>, StorageError> {
        let table = self
            .table
            .read()
            .map_err(|_| StorageError::Lock("read"))?;

        let mut rows = Vec::new();
        for row in &table.rows {
            if limit.is_some_and(|limit| rows.len() >= limit) {
                break;
            }
            if query.matches(row)? {
                rows.push(row.clone());
            }
        }
        Ok(rows)
    }

    async fn count(&self, query: &Query) -> Result<usize, StorageError> {
        let table = self
            .table
            .read()
            .map_err(|_| StorageError::Lock("read"))?;

        let mut count = 0;
        for row in &table.rows {
            if query.matches(row)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn update(&self, query: &Query, changes: &Constraints) -> Result<usize, StorageError> {
        let mut table = self
            .table
            .write()
            .map_err(|_| StorageError::Lock("write"))?;

        let mut matched = Vec::new();
        for (index, row) in table.rows.iter().enumerate() {
            if query.matches(row)? {
                matched.push(index);
            }
        }

        // Rewrite a copy so a bad change leaves the table untouched
        let mut working = table.rows.clone();
        for &index in &matched {
            let mut row = working[index].clone();
            for (field, value) in changes.iter() {
                row.set_field(field, value.clone())?;
            }
            check_unique(&working, &row, Some(index))?;
            working[index] = row;
        }

        // Keys rewritten by the update must not be handed out again
        let mut next_pk = table.next_pk;
        for &index in &matched {
            if let Some(pk) = working[index].pk().as_integer() {
                next_pk = next_pk.max(pk_after::<R>(pk)?);
            }
        }
        table.rows = working;
        table.next_pk = next_pk;

        tracing::debug!(
            model = R::model_name(),
            rows = matched.len(),
            "records updated"
        );
        Ok(matched.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Nest {
        id: Option<i64>,
        code: String,
        occupied: bool,
    }

    impl Record for Nest {
        fn model_name() -> &'static str {
            "nest"
        }

        fn unique_fields() -> &'static [&'static str] {
            &["code"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(self.id.into()),
                "code" => Some(self.code.clone().into()),
                "occupied" => Some(self.occupied.into()),
                _ => None,
            }
        }

        fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), StorageError> {
            match (field, value) {
                ("id", FieldValue::Integer(i)) => self.id = Some(i),
                ("code", FieldValue::String(s)) => self.code = s,
                ("occupied", FieldValue::Boolean(b)) => self.occupied = b,
                (field, value) => {
                    return Err(StorageError::TypeMismatch {
                        model: "nest".into(),
                        field: field.into(),
                        received: value.type_name(),
                    });
                }
            }
            Ok(())
        }
    }

    fn nest(code: &str) -> Nest {
        Nest {
            id: None,
            code: code.into(),
            occupied: false,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_incrementing_pk() {
        let store = InMemoryRecordStore::<Nest>::new();
        let a = store.create(nest("a")).await.unwrap();
        let b = store.create(nest("b")).await.unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
    }

    #[tokio::test]
    async fn test_create_keeps_explicit_pk() {
        let store = InMemoryRecordStore::<Nest>::new();
        let mut explicit = nest("a");
        explicit.id = Some(10);
        store.create(explicit).await.unwrap();
        let next = store.create(nest("b")).await.unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_unique_field() {
        let store = InMemoryRecordStore::<Nest>::new();
        store.create(nest("a")).await.unwrap();
        let err = store.create(nest("a")).await.unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { ref field, .. } if field == "code"));
        assert_eq!(store.count(&Query::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_respects_limit() {
        let store = InMemoryRecordStore::<Nest>::new();
        for code in ["a", "b", "c"] {
            store.create(nest(code)).await.unwrap();
        }
        let rows = store.fetch(&Query::new(), Some(2)).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "a");
    }

    #[tokio::test]
    async fn test_update_with_bad_type_writes_nothing() {
        let store = InMemoryRecordStore::<Nest>::new();
        store.create(nest("a")).await.unwrap();
        store.create(nest("b")).await.unwrap();

        let result = store
            .update(&Query::new(), &Constraints::single("occupied", "yes"))
            .await;
        assert!(matches!(result, Err(StorageError::TypeMismatch { .. })));

        let occupied = Query {
            filters: vec![Constraints::single("occupied", true)],
            excludes: vec![],
        };
        assert_eq!(store.count(&occupied).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_cannot_break_unique_field() {
        let store = InMemoryRecordStore::<Nest>::new();
        store.create(nest("a")).await.unwrap();
        store.create(nest("b")).await.unwrap();

        let result = store
            .update(&Query::new(), &Constraints::single("code", "z"))
            .await;
        assert!(matches!(result, Err(StorageError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_create_at_max_pk_is_rejected_and_store_stays_usable() {
        let store = InMemoryRecordStore::<Nest>::new();
        let mut last = nest("a");
        last.id = Some(i64::MAX);

        let err = store.create(last).await.unwrap_err();
        assert!(matches!(err, StorageError::KeyOverflow { pk: i64::MAX, .. }));
        assert_eq!(store.count(&Query::new()).await.unwrap(), 0);

        let next = store.create(nest("b")).await.unwrap();
        assert_eq!(next.id, Some(1));
    }

    #[tokio::test]
    async fn test_update_to_max_pk_is_rejected() {
        let store = InMemoryRecordStore::<Nest>::new();
        store.create(nest("a")).await.unwrap();

        let result = store
            .update(&Query::new(), &Constraints::single("id", i64::MAX))
            .await;
        assert!(matches!(result, Err(StorageError::KeyOverflow { .. })));

        let first = Query {
            filters: vec![Constraints::single("id", 1)],
            excludes: vec![],
        };
        assert_eq!(store.count(&first).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_of_pk_advances_next_pk() {
        let store = InMemoryRecordStore::<Nest>::new();
        store.create(nest("a")).await.unwrap();

        let first = Query {
            filters: vec![Constraints::single("id", 1)],
            excludes: vec![],
        };
        store
            .update(&first, &Constraints::single("id", 2))
            .await
            .unwrap();

        let next = store.create(nest("b")).await.unwrap();
        assert_eq!(next.id, Some(3));
        assert_eq!(store.count(&Query::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_field_in_query_fails() {
        let store = InMemoryRecordStore::<Nest>::new();
        store.create(nest("a")).await.unwrap();
        let query = Query {
            filters: vec![Constraints::single("colour", "green")],
            excludes: vec![],
        };
        assert!(matches!(
            store.count(&query).await,
            Err(StorageError::UnknownField { .. })
        ));
    }
}
