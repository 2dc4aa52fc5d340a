//! Equality constraints and the query description passed to stores

use crate::core::error::StorageError;
use crate::core::field::FieldValue;
use crate::core::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered `field = value` constraints, ANDed together
///
/// # Example
/// ```rust,ignore
/// let constraints = Constraints::new()
///     .with("is_cuddly", true)
///     .with("colour", "green");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraints(IndexMap<String, FieldValue>);

impl Constraints {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Constraint set with a single `field = value` entry
    pub fn single(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new().with(field, value)
    }

    /// Add (or replace) a constraint
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Add (or replace) a constraint in place
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether `record` satisfies every constraint
    ///
    /// Fails if a constrained field does not exist on the model.
    pub fn matches<R: Record>(&self, record: &R) -> Result<bool, StorageError> {
        for (field, expected) in self.iter() {
            let actual = record
                .field_value(field)
                .ok_or_else(|| StorageError::UnknownField {
                    model: R::model_name().to_string(),
                    field: field.to_string(),
                })?;
            if !actual.lookup_eq(expected) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Constraints {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Declarative description of a query, executed by a
/// [`RecordStore`](crate::core::store::RecordStore)
///
/// Every `filters` entry must match and no `excludes` entry may match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Constraints>,
    pub excludes: Vec<Constraints>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `record` is part of the query result
    pub fn matches<R: Record>(&self, record: &R) -> Result<bool, StorageError> {
        for constraints in &self.filters {
            if !constraints.matches(record)? {
                return Ok(false);
            }
        }
        for constraints in &self.excludes {
            if constraints.matches(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Animal {
        name: String,
        legs: i64,
    }

    impl Record for Animal {
        fn model_name() -> &'static str {
            "animal"
        }

        fn pk_field() -> &'static str {
            "name"
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(self.name.clone().into()),
                "legs" => Some(self.legs.into()),
                _ => None,
            }
        }

        fn set_field(&mut self, _field: &str, _value: FieldValue) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn otter() -> Animal {
        Animal {
            name: "otter".into(),
            legs: 4,
        }
    }

    #[test]
    fn test_empty_constraints_match_everything() {
        assert!(Constraints::new().matches(&otter()).expect("match"));
    }

    #[test]
    fn test_constraints_are_anded() {
        let both = Constraints::new().with("name", "otter").with("legs", 4);
        assert!(both.matches(&otter()).expect("match"));

        let one_wrong = Constraints::new().with("name", "otter").with("legs", 2);
        assert!(!one_wrong.matches(&otter()).expect("match"));
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let result = Constraints::single("wings", 2).matches(&otter());
        assert!(matches!(result, Err(StorageError::UnknownField { .. })));
    }

    #[test]
    fn test_query_excludes() {
        let query = Query {
            filters: vec![Constraints::single("legs", 4)],
            excludes: vec![Constraints::single("name", "otter")],
        };
        assert!(!query.matches(&otter()).expect("match"));
    }

    #[test]
    fn test_constraints_keep_insertion_order() {
        let c: Constraints = vec![("b", 1), ("a", 2)].into_iter().collect();
        let keys: Vec<_> = c.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
