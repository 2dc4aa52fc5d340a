//! A (slightly silly) model and store helpers shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use model_filter::prelude::*;

impl_model!(
    Specie,
    "specie",
    ["common_name", "binomial_name"],
    {
        common_name: String,
        binomial_name: String,
        is_cuddly: Option<bool>,
        last_sighted: Option<DateTime<Utc>>,
        colour: String,
    }
);

/// Unsaved specie with the default colour
pub fn specie(binomial_name: &str, common_name: &str, is_cuddly: Option<bool>) -> Specie {
    Specie::new(
        common_name.to_string(),
        binomial_name.to_string(),
        is_cuddly,
        None,
        "green".to_string(),
    )
}

pub fn new_store() -> Arc<InMemoryRecordStore<Specie>> {
    Arc::new(InMemoryRecordStore::new())
}

pub async fn create(
    store: &Arc<InMemoryRecordStore<Specie>>,
    binomial_name: &str,
    common_name: &str,
    is_cuddly: Option<bool>,
) -> Specie {
    store
        .create(specie(binomial_name, common_name, is_cuddly))
        .await
        .expect("create specie")
}

/// Store the filter runs against, as the trait object filters take
pub fn dyn_store(store: &Arc<InMemoryRecordStore<Specie>>) -> Arc<dyn RecordStore<Specie>> {
    store.clone()
}
