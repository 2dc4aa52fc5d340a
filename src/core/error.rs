//! Typed error handling for record lookups and filters
//!
//! # Error Categories
//!
//! - [`FilterError`]: returned by [`Filter::apply`](crate::core::validation::Filter::apply).
//!   Either an expected validation failure (a code such as `not_found`) or an
//!   opaque `exception`.
//! - [`StorageError`]: failures of a [`RecordStore`](crate::core::store::RecordStore) backend
//! - [`LookupError`]: outcome of [`QuerySet::get`](crate::core::queryset::QuerySet::get)
//! - [`ConfigError`]: failures while loading or applying a filter configuration
//!
//! # Example
//!
//! ```rust,ignore
//! match filter.apply(Some(42.into())).await {
//!     Ok(Some(specie)) => println!("Found: {:?}", specie),
//!     Ok(None) => println!("No value provided"),
//!     Err(e) if e.code() == codes::NOT_FOUND => println!("No such specie"),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Error codes reported by the filters in this crate
pub mod codes {
    /// Zero records satisfy the lookup
    pub const NOT_FOUND: &str = "not_found";

    /// More than one record satisfies the lookup
    pub const NOT_UNIQUE: &str = "not_unique";

    /// A null value reached a filter that requires one
    pub const EMPTY: &str = "empty";

    /// Something unexpected went wrong while filtering
    pub const EXCEPTION: &str = "exception";
}

/// Boxed source error carried by [`FilterError::Exception`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error returned by every filter
#[derive(Debug, Error)]
pub enum FilterError {
    /// The value is well-formed but does not pass validation
    #[error("{message}")]
    Invalid { code: &'static str, message: String },

    /// An unexpected failure happened while the filter was running
    #[error("An exception occurred during filtering: {message}")]
    Exception {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl FilterError {
    /// Build a validation failure
    pub fn invalid(code: &'static str, message: impl Into<String>) -> Self {
        FilterError::Invalid {
            code,
            message: message.into(),
        }
    }

    /// Build an exception-class failure without an underlying error
    pub fn exception(message: impl Into<String>) -> Self {
        FilterError::Exception {
            message: message.into(),
            source: None,
        }
    }

    /// Build an exception-class failure wrapping the error that caused it
    pub fn exception_from(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        FilterError::Exception {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::Invalid { code, .. } => code,
            FilterError::Exception { .. } => codes::EXCEPTION,
        }
    }

    /// Whether this is an exception rather than a validation failure
    pub fn is_exception(&self) -> bool {
        matches!(self, FilterError::Exception { .. })
    }

    /// Convert to a serializable message
    pub fn to_message(&self) -> FilterMessage {
        FilterMessage {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serializable code + message pair, as collected by a
/// [`FilterRunner`](crate::core::validation::FilterRunner)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterMessage {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// A query or write referenced a field the model does not have
    #[error("{model} has no field named '{field}'")]
    UnknownField { model: String, field: String },

    /// A write would break a unique constraint
    #[error("{model} with {field}={value} already exists")]
    UniqueViolation {
        model: String,
        field: String,
        value: String,
    },

    /// A value of the wrong type was written to a field
    #[error("{model}.{field} cannot hold a {received} value")]
    TypeMismatch {
        model: String,
        field: String,
        received: &'static str,
    },

    /// The backing lock was poisoned
    #[error("Failed to acquire {0} lock")]
    Lock(&'static str),

    /// No integer primary key is left to assign
    #[error("{model} primary key {pk} leaves no room for another record")]
    KeyOverflow { model: String, pk: i64 },
}

/// Outcome of a single-record lookup that did not find exactly one row
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{model} matching query does not exist")]
    DoesNotExist { model: String },

    #[error("get() returned more than one {model} -- it returned {count}")]
    MultipleObjectsReturned { model: String, count: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors related to loading and applying filter configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration targets model '{configured}' but the store holds '{actual}'")]
    ModelMismatch { configured: String, actual: String },
}
