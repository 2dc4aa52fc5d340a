//! Filter trait and general-purpose filters
//!
//! A filter receives an optional value (`None` is "no value provided") and
//! returns either a cleaned value or a [`FilterError`]. Filters compose with
//! [`FilterExt::then`].

use crate::core::error::{FilterError, codes};
use crate::core::field::FieldValue;
use async_trait::async_trait;
use std::marker::PhantomData;

/// A single validation/transformation step
#[async_trait]
pub trait Filter: Send + Sync {
    /// Type accepted by the filter
    type Input: Send + 'static;

    /// Type produced on success
    type Output: Send + 'static;

    /// Validate `value`, returning the cleaned value
    async fn apply(&self, value: Option<Self::Input>) -> Result<Option<Self::Output>, FilterError>;
}

/// Combinators available on every filter
pub trait FilterExt: Filter + Sized {
    /// Feed the output of this filter into `next`
    ///
    /// The chain stops at the first error.
    fn then<B>(self, next: B) -> Chain<Self, B>
    where
        B: Filter<Input = Self::Output>,
    {
        Chain {
            first: self,
            second: next,
        }
    }
}

impl<F: Filter> FilterExt for F {}

/// Two filters applied one after the other, see [`FilterExt::then`]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

#[async_trait]
impl<A, B> Filter for Chain<A, B>
where
    A: Filter,
    B: Filter<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    async fn apply(&self, value: Option<Self::Input>) -> Result<Option<Self::Output>, FilterError> {
        let intermediate = self.first.apply(value).await?;
        self.second.apply(intermediate).await
    }
}

/// Values that can carry an explicit null alongside `None`
pub trait Nullable {
    fn is_null(&self) -> bool;
}

impl Nullable for FieldValue {
    fn is_null(&self) -> bool {
        FieldValue::is_null(self)
    }
}

/// Filter: reject missing and null values, pass everything else through unchanged
pub struct Required<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Required<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Required<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Nullable + Send + 'static> Filter for Required<T> {
    type Input = T;
    type Output = T;

    async fn apply(&self, value: Option<T>) -> Result<Option<T>, FilterError> {
        match value {
            Some(value) if !value.is_null() => Ok(Some(value)),
            _ => Err(FilterError::invalid(codes::EMPTY, "This value is required.")),
        }
    }
}

/// Filter: trim whitespace from string values, other values pass through
#[derive(Debug, Clone, Copy, Default)]
pub struct Trim;

#[async_trait]
impl Filter for Trim {
    type Input = FieldValue;
    type Output = FieldValue;

    async fn apply(&self, value: Option<FieldValue>) -> Result<Option<FieldValue>, FilterError> {
        Ok(value.map(|value| match value {
            FieldValue::String(s) => FieldValue::String(s.trim().to_string()),
            other => other,
        }))
    }
}
