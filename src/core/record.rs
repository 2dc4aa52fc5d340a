//! Record trait defining the abstraction for stored model instances

use crate::core::error::StorageError;
use crate::core::field::FieldValue;

/// Base trait for every stored record type (one per model/table).
///
/// A record exposes its fields dynamically so that lookups can be
/// expressed as `field = value` constraints without knowing the concrete
/// type. Use [`impl_model!`](crate::impl_model) to derive it.
pub trait Record: Clone + Send + Sync + 'static {
    /// Model name used in messages and configuration (e.g. "specie")
    fn model_name() -> &'static str;

    /// Name of the primary key field
    fn pk_field() -> &'static str {
        "id"
    }

    /// Fields that must hold distinct values across the table
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }

    /// Get the value of a specific field by name, `None` if there is no such field
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Overwrite a field by name
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), StorageError>;

    /// Primary key value, `Null` until the record is saved
    fn pk(&self) -> FieldValue {
        self.field_value(Self::pk_field())
            .unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Tag {
        id: Option<i64>,
        label: String,
    }

    impl Record for Tag {
        fn model_name() -> &'static str {
            "tag"
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(self.id.into()),
                "label" => Some(self.label.clone().into()),
                _ => None,
            }
        }

        fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), StorageError> {
            match (field, value) {
                ("id", FieldValue::Integer(i)) => self.id = Some(i),
                ("label", FieldValue::String(s)) => self.label = s,
                (field, value) => {
                    return Err(StorageError::TypeMismatch {
                        model: "tag".into(),
                        field: field.into(),
                        received: value.type_name(),
                    });
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_default_pk_field() {
        assert_eq!(Tag::pk_field(), "id");
        assert!(Tag::unique_fields().is_empty());
    }

    #[test]
    fn test_unsaved_pk_is_null() {
        let tag = Tag {
            id: None,
            label: "rodent".into(),
        };
        assert!(tag.pk().is_null());
    }

    #[test]
    fn test_set_field_updates_pk() {
        let mut tag = Tag {
            id: None,
            label: "rodent".into(),
        };
        tag.set_field("id", FieldValue::Integer(7)).expect("set id");
        assert_eq!(tag.pk(), FieldValue::Integer(7));
        assert!(tag.set_field("label", FieldValue::Integer(1)).is_err());
    }
}
