//! Resolve specie keys against an in-memory table.
//!
//! Run with `RUST_LOG=model_filter=debug cargo run --example specie_lookup`.

use anyhow::Result;
use model_filter::prelude::*;
use tracing_subscriber::EnvFilter;

impl_model!(
    Specie,
    "specie",
    ["common_name", "binomial_name"],
    {
        common_name: String,
        binomial_name: String,
        is_cuddly: Option<bool>,
    }
);

const CONFIG: &str = r#"
model: specie
field: common_name
filter:
  is_cuddly: true
"#;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store: Arc<dyn RecordStore<Specie>> = Arc::new(InMemoryRecordStore::new());
    for (common, binomial, cuddly) in [
        ("Golden Hamster", "Mesocricetus Auratus", Some(true)),
        ("Quokka", "Setonix Brachyurus", Some(false)),
        ("Jerboa", "Allactaga Tetradactyla", None),
    ] {
        store
            .create(Specie::new(common.into(), binomial.into(), cuddly))
            .await?;
    }

    let by_pk = Required::<FieldValue>::new().then(ModelFilter::new(store.clone()));
    let config = ModelFilterConfig::from_yaml_str(CONFIG)?;
    let cuddly_by_name = Trim.then(ModelFilter::from_config(&config, store.clone())?);

    let mut runner = FilterRunner::with_key(by_pk, "specie");
    for key in [Some(FieldValue::Integer(1)), Some(FieldValue::Integer(42)), None] {
        runner.apply(key.clone()).await;
        report(&format!("pk {:?}", key), runner.cleaned_data(), runner.errors())?;
    }

    let mut runner = FilterRunner::with_key(cuddly_by_name, "common_name");
    for name in ["Golden Hamster", " Quokka "] {
        runner.apply(Some(name.into())).await;
        report(name, runner.cleaned_data(), runner.errors())?;
    }

    Ok(())
}

fn report(
    label: &str,
    cleaned: Option<&Specie>,
    errors: &indexmap::IndexMap<String, Vec<FilterMessage>>,
) -> Result<()> {
    match cleaned {
        Some(specie) => println!("{label}: {}", serde_json::to_string(specie)?),
        None if errors.is_empty() => println!("{label}: no value"),
        None => println!("{label}: {}", serde_json::to_string(errors)?),
    }
    Ok(())
}
