//! Named QuerySet transforms applied before a model lookup
//!
//! A predicate receives the QuerySet built so far and must hand back a new
//! QuerySet. Anything else (a scalar, an error) aborts the lookup with an
//! `exception`. Predicates run against the live store: a write performed by
//! a predicate is kept even when the lookup fails afterwards.

use crate::core::query::Constraints;
use crate::core::queryset::QuerySet;
use crate::core::record::Record;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;

/// What a predicate produced
#[derive(Debug)]
pub enum PredicateOutput<R: Record> {
    /// A narrowed/transformed QuerySet; the only valid predicate result
    QuerySet(QuerySet<R>),

    /// Any non-QuerySet result, e.g. a row count
    Value(Value),
}

type PredicateFn<R> =
    dyn Fn(QuerySet<R>) -> BoxFuture<'static, anyhow::Result<PredicateOutput<R>>> + Send + Sync;

/// A named QuerySet transform
pub struct Predicate<R: Record> {
    name: String,
    call: Arc<PredicateFn<R>>,
}

impl<R: Record> Clone for Predicate<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            call: Arc::clone(&self.call),
        }
    }
}

impl<R: Record> std::fmt::Debug for Predicate<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<R: Record> Predicate<R> {
    /// Wrap an arbitrary async transform
    ///
    /// # Example
    /// ```rust,ignore
    /// let cuddly_only = Predicate::new("cuddly_only", |qs: QuerySet<Specie>| async move {
    ///     Ok(PredicateOutput::QuerySet(qs.filter(Constraints::single("is_cuddly", true))))
    /// });
    /// ```
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(QuerySet<R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<PredicateOutput<R>>> + Send + 'static,
    {
        Self {
            name: name.into(),
            call: Arc::new(move |qs: QuerySet<R>| f(qs).boxed()),
        }
    }

    /// Predicate that calls a QuerySet method; named after the method
    pub fn method(method: QuerySetMethod) -> Self {
        Self::named_method(method.name(), method)
    }

    /// Predicate that calls a QuerySet method under a custom name
    pub fn named_method(name: impl Into<String>, method: QuerySetMethod) -> Self {
        Self::new(name, move |qs| {
            let method = method.clone();
            async move { method.call(qs).await }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the transform
    pub async fn call(&self, queryset: QuerySet<R>) -> anyhow::Result<PredicateOutput<R>> {
        (self.call)(queryset).await
    }
}

/// QuerySet methods a predicate can invoke by name
///
/// `count` and `update` are genuine methods but return scalars, so using
/// them as a predicate fails the lookup (after `update` has written).
///
/// Externally tagged: `{ "filter": { "colour": "green" } }` or `"count"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuerySetMethod {
    All,
    Filter(Constraints),
    Exclude(Constraints),
    Count,
    Update(Constraints),
}

impl QuerySetMethod {
    pub fn name(&self) -> &'static str {
        match self {
            QuerySetMethod::All => "all",
            QuerySetMethod::Filter(_) => "filter",
            QuerySetMethod::Exclude(_) => "exclude",
            QuerySetMethod::Count => "count",
            QuerySetMethod::Update(_) => "update",
        }
    }

    /// Invoke the method on `queryset`
    pub async fn call<R: Record>(
        &self,
        queryset: QuerySet<R>,
    ) -> anyhow::Result<PredicateOutput<R>> {
        Ok(match self {
            QuerySetMethod::All => PredicateOutput::QuerySet(queryset),
            QuerySetMethod::Filter(constraints) => {
                PredicateOutput::QuerySet(queryset.filter(constraints.clone()))
            }
            QuerySetMethod::Exclude(constraints) => {
                PredicateOutput::QuerySet(queryset.exclude(constraints.clone()))
            }
            QuerySetMethod::Count => PredicateOutput::Value(json!(queryset.count().await?)),
            QuerySetMethod::Update(changes) => {
                PredicateOutput::Value(json!(queryset.update(changes).await?))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(QuerySetMethod::Count.name(), "count");
        assert_eq!(
            QuerySetMethod::Exclude(Constraints::new()).name(),
            "exclude"
        );
    }

    #[test]
    fn test_method_from_json() {
        let method: QuerySetMethod =
            serde_json::from_value(json!({ "filter": { "colour": "green" } })).expect("filter");
        assert_eq!(
            method,
            QuerySetMethod::Filter(Constraints::single("colour", "green"))
        );

        let method: QuerySetMethod = serde_json::from_value(json!("count")).expect("count");
        assert_eq!(method, QuerySetMethod::Count);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let result = serde_json::from_value::<QuerySetMethod>(json!("delete"));
        assert!(result.is_err());
    }
}
