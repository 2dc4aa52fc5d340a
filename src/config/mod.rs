//! Configuration loading for model filters

use crate::core::error::ConfigError;
use crate::core::query::Constraints;
use crate::core::record::Record;
use crate::core::validation::{Predicate, QuerySetMethod};
use serde::{Deserialize, Serialize};

/// A predicate declared in configuration: a QuerySet method call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateConfig {
    /// Name reported in errors and logs; defaults to the method name
    #[serde(default)]
    pub name: Option<String>,

    /// Method to call, e.g. `{ exclude: { colour: green } }` or `count`
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub call: QuerySetMethod,
}

impl PredicateConfig {
    pub fn to_predicate<R: Record>(&self) -> Predicate<R> {
        match &self.name {
            Some(name) => Predicate::named_method(name.clone(), self.call.clone()),
            None => Predicate::method(self.call.clone()),
        }
    }
}

/// Declarative configuration of a [`ModelFilter`](crate::core::validation::ModelFilter)
///
/// # Example
/// ```yaml
/// model: specie
/// field: common_name
/// filter:
///   is_cuddly: true
/// predicates:
///   - name: only_green
///     call:
///       filter:
///         colour: green
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFilterConfig {
    /// Target model name, checked against `Record::model_name()`
    pub model: String,

    /// Match field; the primary key when omitted
    #[serde(default)]
    pub field: Option<String>,

    /// Static equality constraints
    #[serde(default)]
    pub filter: Constraints,

    /// Predicates, applied in order
    #[serde(default)]
    pub predicates: Vec<PredicateConfig>,
}

impl ModelFilterConfig {
    /// Minimal configuration: match `model` on its primary key
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            field: None,
            filter: Constraints::new(),
            predicates: Vec::new(),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;

    #[test]
    fn test_minimal_config() {
        let config = ModelFilterConfig::from_yaml_str("model: specie\n").unwrap();
        assert_eq!(config, ModelFilterConfig::for_model("specie"));
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
model: specie
field: common_name
filter:
  is_cuddly: false
  colour: green
predicates:
  - name: not_red
    call:
      exclude:
        colour: red
  - call: count
"#;
        let config = ModelFilterConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.field.as_deref(), Some("common_name"));
        assert_eq!(
            config.filter,
            Constraints::new()
                .with("is_cuddly", false)
                .with("colour", "green")
        );
        assert_eq!(config.predicates.len(), 2);
        assert_eq!(config.predicates[0].name.as_deref(), Some("not_red"));
        assert_eq!(
            config.predicates[0].call,
            QuerySetMethod::Exclude(Constraints::single("colour", FieldValue::from("red")))
        );
        assert_eq!(config.predicates[1].call, QuerySetMethod::Count);
    }

    #[test]
    fn test_missing_model_is_rejected() {
        let result = ModelFilterConfig::from_yaml_str("field: id\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let yaml = "model: specie\npredicates:\n  - call: delete\n";
        assert!(ModelFilterConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.yaml");
        std::fs::write(&path, "model: specie\nfield: binomial_name\n").unwrap();

        let config = ModelFilterConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.field.as_deref(), Some("binomial_name"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ModelFilterConfig::from_yaml_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
