//! Runs a filter and collects the outcome instead of propagating errors

use super::filters::Filter;
use crate::core::error::{FilterError, FilterMessage};
use indexmap::IndexMap;

/// Key under which errors for the top-level value are reported
pub const ROOT_KEY: &str = "";

/// Applies a filter and records cleaned data, error messages keyed by field
/// path, and whether an exception (rather than a validation failure) occurred.
///
/// # Usage
///
/// ```rust,ignore
/// let mut runner = FilterRunner::new(ModelFilter::new(store));
/// runner.apply(Some(42.into())).await;
///
/// if runner.is_valid() {
///     let specie = runner.cleaned_data();
/// } else {
///     println!("{:?}", runner.error_codes()); // {"": ["not_found"]}
/// }
/// ```
pub struct FilterRunner<F: Filter> {
    filter: F,
    key: String,
    cleaned_data: Option<F::Output>,
    errors: IndexMap<String, Vec<FilterMessage>>,
    has_exceptions: bool,
}

impl<F: Filter> FilterRunner<F> {
    /// Runner reporting errors under the root key
    pub fn new(filter: F) -> Self {
        Self::with_key(filter, ROOT_KEY)
    }

    /// Runner reporting errors under `key` (e.g. the name of the request field)
    pub fn with_key(filter: F, key: impl Into<String>) -> Self {
        Self {
            filter,
            key: key.into(),
            cleaned_data: None,
            errors: IndexMap::new(),
            has_exceptions: false,
        }
    }

    /// Run the filter on `value`, replacing the outcome of any previous run
    pub async fn apply(&mut self, value: Option<F::Input>) -> &mut Self {
        self.cleaned_data = None;
        self.errors.clear();
        self.has_exceptions = false;

        match self.filter.apply(value).await {
            Ok(cleaned) => self.cleaned_data = cleaned,
            Err(e) => self.record(e),
        }
        self
    }

    fn record(&mut self, error: FilterError) {
        if error.is_exception() {
            tracing::error!(key = %self.key, error = %error, "exception during filtering");
            self.has_exceptions = true;
        }
        self.errors
            .entry(self.key.clone())
            .or_default()
            .push(error.to_message());
    }

    /// Whether the last run produced no errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the last run failed with an exception
    pub fn has_exceptions(&self) -> bool {
        self.has_exceptions
    }

    /// Cleaned value of the last run, `None` if it failed or the input was null
    pub fn cleaned_data(&self) -> Option<&F::Output> {
        self.cleaned_data.as_ref()
    }

    /// Take ownership of the cleaned value
    pub fn into_cleaned_data(self) -> Option<F::Output> {
        self.cleaned_data
    }

    pub fn errors(&self) -> &IndexMap<String, Vec<FilterMessage>> {
        &self.errors
    }

    /// Error codes only, keyed like [`errors`](Self::errors)
    pub fn error_codes(&self) -> IndexMap<String, Vec<String>> {
        self.errors
            .iter()
            .map(|(key, messages)| {
                (
                    key.clone(),
                    messages.iter().map(|m| m.code.clone()).collect(),
                )
            })
            .collect()
    }
}
