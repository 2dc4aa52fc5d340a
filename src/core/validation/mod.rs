//! Validation and filtering system
//!
//! Filters validate and transform a single incoming value. The centrepiece is
//! [`ModelFilter`], which turns a key into the record it identifies.
//! [`FilterRunner`] collects results the way a request handler reports them.

pub mod filters;
pub mod model;
pub mod predicates;
pub mod runner;

pub use filters::{Chain, Filter, FilterExt, Nullable, Required, Trim};
pub use model::ModelFilter;
pub use predicates::{Predicate, PredicateOutput, QuerySetMethod};
pub use runner::{FilterRunner, ROOT_KEY};
