//! Model filter: resolve an incoming value to exactly one stored record

use super::filters::Filter;
use super::predicates::{Predicate, PredicateOutput};
use crate::config::ModelFilterConfig;
use crate::core::error::{ConfigError, FilterError, LookupError, codes};
use crate::core::field::FieldValue;
use crate::core::query::Constraints;
use crate::core::queryset::QuerySet;
use crate::core::record::Record;
use crate::core::store::RecordStore;
use async_trait::async_trait;
use std::sync::Arc;

/// Looks up the single record of model `R` whose match field equals the
/// incoming value and replaces the value with that record.
///
/// - `None` and `FieldValue::Null` come out as `None` and no query is made; chain a
///   [`Required`](super::filters::Required) in front to reject it.
/// - Zero matches fail with `not_found`, several with `not_unique`.
/// - Static constraints ([`ModelFilter::filter`]) are ANDed with the match.
/// - Predicates run in the order they were added, each receiving the
///   QuerySet produced by the previous one. A predicate that errors or
///   returns something other than a QuerySet fails the lookup with
///   `exception`. Writes it made are not rolled back.
///
/// # Example
/// ```rust,ignore
/// let filter = ModelFilter::new(store.clone())
///     .field("common_name")
///     .filter(Constraints::single("is_cuddly", true));
///
/// let specie = filter.apply(Some("Quokka".into())).await?;
/// ```
pub struct ModelFilter<R: Record> {
    store: Arc<dyn RecordStore<R>>,
    field: String,
    filter: Constraints,
    predicates: Vec<Predicate<R>>,
}

impl<R: Record> Clone for ModelFilter<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            field: self.field.clone(),
            filter: self.filter.clone(),
            predicates: self.predicates.clone(),
        }
    }
}

impl<R: Record> std::fmt::Debug for ModelFilter<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelFilter")
            .field("model", &R::model_name())
            .field("field", &self.field)
            .field("filter", &self.filter)
            .field("predicates", &self.predicates)
            .finish()
    }
}

impl<R: Record> ModelFilter<R> {
    /// Match on the primary key of the records held by `store`
    pub fn new(store: Arc<dyn RecordStore<R>>) -> Self {
        Self {
            store,
            field: R::pk_field().to_string(),
            filter: Constraints::new(),
            predicates: Vec::new(),
        }
    }

    /// Build a filter from a loaded configuration
    ///
    /// # Errors
    /// [`ConfigError::ModelMismatch`] if the configuration targets another model.
    pub fn from_config(
        config: &ModelFilterConfig,
        store: Arc<dyn RecordStore<R>>,
    ) -> Result<Self, ConfigError> {
        if config.model != R::model_name() {
            return Err(ConfigError::ModelMismatch {
                configured: config.model.clone(),
                actual: R::model_name().to_string(),
            });
        }

        let mut filter = Self::new(store).filter(config.filter.clone());
        if let Some(field) = &config.field {
            filter = filter.field(field.clone());
        }
        for predicate in &config.predicates {
            filter = filter.predicate(predicate.to_predicate());
        }
        Ok(filter)
    }

    /// Match the incoming value against `field` instead of the primary key
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Add static equality constraints applied to every lookup
    pub fn filter(mut self, constraints: Constraints) -> Self {
        for (field, value) in constraints.iter() {
            self.filter.insert(field, value.clone());
        }
        self
    }

    /// Append a predicate; predicates run in insertion order
    pub fn predicate(mut self, predicate: Predicate<R>) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Field compared against the incoming value
    pub fn match_field(&self) -> &str {
        &self.field
    }

    /// Static constraints, in the order they were added
    pub fn constraints(&self) -> &Constraints {
        &self.filter
    }

    /// Predicates, in the order they run
    pub fn predicates(&self) -> &[Predicate<R>] {
        &self.predicates
    }

    /// Static constraints and predicates applied, match field not yet
    async fn base_queryset(&self) -> Result<QuerySet<R>, FilterError> {
        let mut queryset = QuerySet::all(Arc::clone(&self.store)).filter(self.filter.clone());

        for predicate in &self.predicates {
            queryset = match predicate.call(queryset).await {
                Ok(PredicateOutput::QuerySet(next)) => next,
                Ok(PredicateOutput::Value(value)) => {
                    tracing::warn!(
                        model = R::model_name(),
                        predicate = predicate.name(),
                        returned = %value,
                        "predicate did not return a QuerySet"
                    );
                    return Err(FilterError::exception(format!(
                        "Predicate '{}' returned {} instead of a QuerySet",
                        predicate.name(),
                        value
                    )));
                }
                Err(e) => {
                    tracing::warn!(
                        model = R::model_name(),
                        predicate = predicate.name(),
                        error = %e,
                        "predicate failed"
                    );
                    return Err(FilterError::exception_from(e));
                }
            };
        }

        Ok(queryset)
    }

    async fn lookup(&self, value: FieldValue) -> Result<R, FilterError> {
        let queryset = self.base_queryset().await?;
        let matching = Constraints::single(self.field.clone(), value.clone());

        let count = queryset
            .clone()
            .filter(matching.clone())
            .count()
            .await
            .map_err(FilterError::exception_from)?;

        tracing::debug!(
            model = R::model_name(),
            field = %self.field,
            value = %value,
            count,
            "model lookup"
        );

        match count {
            0 => Err(self.not_found(&value)),
            1 => queryset.get(matching).await.map_err(|e| match e {
                // The table changed between count and fetch
                LookupError::DoesNotExist { .. } => self.not_found(&value),
                LookupError::MultipleObjectsReturned { count, .. } => {
                    self.not_unique(&value, count)
                }
                LookupError::Storage(e) => FilterError::exception_from(e),
            }),
            count => Err(self.not_unique(&value, count)),
        }
    }

    fn not_found(&self, value: &FieldValue) -> FilterError {
        FilterError::invalid(
            codes::NOT_FOUND,
            format!(
                "Unable to find a {} record with {}={}.",
                R::model_name(),
                self.field,
                value
            ),
        )
    }

    fn not_unique(&self, value: &FieldValue, count: usize) -> FilterError {
        FilterError::invalid(
            codes::NOT_UNIQUE,
            format!(
                "Found {} {} records with {}={}; expected exactly one.",
                count,
                R::model_name(),
                self.field,
                value
            ),
        )
    }
}

#[async_trait]
impl<R: Record> Filter for ModelFilter<R> {
    type Input = FieldValue;
    type Output = R;

    async fn apply(&self, value: Option<FieldValue>) -> Result<Option<R>, FilterError> {
        match value {
            None | Some(FieldValue::Null) => {
                tracing::trace!(model = R::model_name(), "null value, lookup skipped");
                Ok(None)
            }
            Some(value) => self.lookup(value).await.map(Some),
        }
    }
}
