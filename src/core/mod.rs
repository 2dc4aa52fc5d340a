//! Core module containing the record abstraction, queries and filters

pub mod error;
pub mod field;
pub mod query;
pub mod queryset;
pub mod record;
pub mod store;
pub mod validation;

pub use error::{ConfigError, FilterError, FilterMessage, LookupError, StorageError, codes};
pub use field::{FieldValue, FromFieldValue};
pub use query::{Constraints, Query};
pub use queryset::QuerySet;
pub use record::Record;
pub use store::RecordStore;
pub use validation::{Filter, FilterExt, FilterRunner, ModelFilter, Predicate, Required};
