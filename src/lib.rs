//! # Model Filter
//!
//! Validation filters that resolve an incoming value (usually a primary key)
//! to the single stored record it identifies.
//!
//! ## Features
//!
//! - **Model lookups**: `ModelFilter` replaces a key with its record, or fails
//!   with `not_found` / `not_unique`
//! - **Static constraints**: extra `field = value` conditions ANDed with the match
//! - **Predicates**: ordered QuerySet transforms (closures or named methods)
//! - **Composable filters**: chain `Required`, `Trim` and your own filters
//! - **Pluggable storage**: anything implementing `RecordStore`, with an
//!   in-memory store included
//! - **YAML configuration**: declare filters with `ModelFilterConfig`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use model_filter::prelude::*;
//!
//! impl_model!(
//!     Specie,
//!     "specie",
//!     ["common_name", "binomial_name"],
//!     {
//!         common_name: String,
//!         binomial_name: String,
//!         is_cuddly: Option<bool>,
//!     }
//! );
//!
//! let store = Arc::new(InMemoryRecordStore::<Specie>::new());
//! let hamster = store
//!     .create(Specie::new("Golden Hamster".into(), "Mesocricetus Auratus".into(), Some(true)))
//!     .await?;
//!
//! let filter = Required::<FieldValue>::new().then(ModelFilter::new(store.clone()));
//! assert_eq!(filter.apply(Some(hamster.pk())).await?, Some(hamster));
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        field::{FieldValue, FromFieldValue},
        record::Record,
        store::RecordStore,
        validation::{Filter, FilterExt},
    };

    // === Queries ===
    pub use crate::core::{
        query::{Constraints, Query},
        queryset::QuerySet,
    };

    // === Filters ===
    pub use crate::core::validation::{
        FilterRunner, ModelFilter, Nullable, Predicate, PredicateOutput, QuerySetMethod, Required,
        Trim,
    };

    // === Errors ===
    pub use crate::core::error::{
        ConfigError, FilterError, FilterMessage, LookupError, StorageError, codes,
    };

    // === Macros ===
    pub use crate::impl_model;

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryRecordStore;

    // === Config ===
    pub use crate::config::{ModelFilterConfig, PredicateConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
