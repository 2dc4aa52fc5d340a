//! Macros for reducing boilerplate when declaring records
//!
//! These macros generate the struct and the [`Record`](crate::core::Record)
//! implementation needed for each model.

/// Complete macro to declare a model with an auto-assigned integer primary key
///
/// Generates the struct (with an `id: Option<i64>` primary key that stores
/// fill in on create), its `Record` implementation with dynamic access to
/// every field, and a `new` constructor.
///
/// Field types must convert into [`FieldValue`](crate::core::FieldValue) and
/// implement [`FromFieldValue`](crate::core::FromFieldValue).
///
/// # Example
///
/// ```rust,ignore
/// use model_filter::prelude::*;
///
/// impl_model!(
///     Specie,
///     "specie",
///     ["common_name", "binomial_name"],
///     {
///         common_name: String,
///         binomial_name: String,
///         is_cuddly: Option<bool>,
///     }
/// );
///
/// let specie = Specie::new(
///     "Golden Hamster".to_string(),
///     "Mesocricetus Auratus".to_string(),
///     Some(true),
/// );
/// ```
#[macro_export]
macro_rules! impl_model {
    (
        $type:ident,
        $model_name:expr,
        [ $( $unique_field:expr ),* $(,)? ],
        {
            $( $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Primary key, `None` until saved
            pub id: Option<i64>,
            $( pub $field : $field_type ),*
        }

        impl $crate::core::record::Record for $type {
            fn model_name() -> &'static str {
                $model_name
            }

            fn unique_fields() -> &'static [&'static str] {
                &[ $( $unique_field ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    "id" => Some($crate::core::field::FieldValue::from(self.id)),
                    $(
                        stringify!($field) => Some($crate::core::field::FieldValue::from(
                            self.$field.clone(),
                        )),
                    )*
                    _ => None,
                }
            }

            fn set_field(
                &mut self,
                field: &str,
                value: $crate::core::field::FieldValue,
            ) -> Result<(), $crate::core::error::StorageError> {
                let mismatch = |received: &'static str| $crate::core::error::StorageError::TypeMismatch {
                    model: $model_name.to_string(),
                    field: field.to_string(),
                    received,
                };
                match field {
                    "id" => {
                        self.id = <Option<i64> as $crate::core::field::FromFieldValue>::from_field_value(value)
                            .map_err(mismatch)?;
                    }
                    $(
                        stringify!($field) => {
                            self.$field = <$field_type as $crate::core::field::FromFieldValue>::from_field_value(value)
                                .map_err(mismatch)?;
                        }
                    )*
                    _ => {
                        return Err($crate::core::error::StorageError::UnknownField {
                            model: $model_name.to_string(),
                            field: field.to_string(),
                        });
                    }
                }
                Ok(())
            }
        }

        impl $type {
            /// Create a new, unsaved instance
            #[allow(clippy::too_many_arguments)]
            pub fn new( $( $field: $field_type ),* ) -> Self {
                Self {
                    id: None,
                    $( $field ),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::error::StorageError;
    use crate::core::field::FieldValue;
    use crate::core::record::Record;

    crate::impl_model!(
        Warren,
        "warren",
        ["name"],
        {
            name: String,
            burrows: i64,
            active: Option<bool>,
        }
    );

    #[test]
    fn test_generated_metadata() {
        assert_eq!(Warren::model_name(), "warren");
        assert_eq!(Warren::pk_field(), "id");
        assert_eq!(Warren::unique_fields(), &["name"]);
    }

    #[test]
    fn test_generated_field_access() {
        let warren = Warren::new("Watership Down".into(), 12, None);
        assert_eq!(warren.field_value("id"), Some(FieldValue::Null));
        assert_eq!(
            warren.field_value("name"),
            Some(FieldValue::from("Watership Down"))
        );
        assert_eq!(warren.field_value("burrows"), Some(FieldValue::Integer(12)));
        assert_eq!(warren.field_value("active"), Some(FieldValue::Null));
        assert_eq!(warren.field_value("colour"), None);
    }

    #[test]
    fn test_generated_set_field() {
        let mut warren = Warren::new("Efrafa".into(), 40, Some(true));
        warren.set_field("id", FieldValue::Integer(3)).unwrap();
        warren.set_field("active", FieldValue::Null).unwrap();
        assert_eq!(warren.id, Some(3));
        assert_eq!(warren.active, None);

        assert!(matches!(
            warren.set_field("burrows", FieldValue::from("many")),
            Err(StorageError::TypeMismatch { received: "string", .. })
        ));
        assert!(matches!(
            warren.set_field("colour", FieldValue::from("green")),
            Err(StorageError::UnknownField { .. })
        ));
    }
}
