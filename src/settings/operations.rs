use super::{FieldRef, Settings, Slot};
use crate::error::{Error, Result, SettingsError, ValidationError};
use crate::fields::ValueKind;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

impl Settings {
    fn unknown_field(&self, name: &str) -> SettingsError {
        SettingsError::UnknownField {
            settings: self.schema.name().to_string(),
            field: name.to_string(),
        }
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Current value of a declared field.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownField`] if `name` is not declared.
    pub fn get(&self, name: &str) -> std::result::Result<FieldRef<'_>, SettingsError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| self.unknown_field(name))?;

        Ok(match &self.values[index] {
            Slot::Scalar(value) => FieldRef::Value(value),
            Slot::Nested(settings) => FieldRef::Nested(settings.as_ref()),
        })
    }

    /// Current value of a declared field, deserialized into `T`.
    ///
    /// Nested settings are exported with [`to_mapping`](Settings::to_mapping)
    /// first, so they can be read into a plain struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The field is not declared
    /// - The value cannot be deserialized to type `T`
    pub fn value<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let value = self.get(name)?.to_value();
        serde_json::from_value(value).map_err(|source| Error::Convert {
            field: name.to_string(),
            source,
        })
    }

    /// Owned nested settings of a declared nested field.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::UnknownField`] if `name` is not declared
    /// - [`SettingsError::NotNested`] if `name` is a scalar field
    pub fn nested(&self, name: &str) -> std::result::Result<&Settings, SettingsError> {
        self.get(name)?
            .as_nested()
            .ok_or_else(|| SettingsError::NotNested(name.to_string()))
    }

    /// Mutable access to nested settings, for changing single nested fields.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::UnknownField`] if `name` is not declared
    /// - [`SettingsError::NotNested`] if `name` is a scalar field
    pub fn nested_mut(&mut self, name: &str) -> std::result::Result<&mut Settings, SettingsError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| self.unknown_field(name))?;

        match &mut self.values[index] {
            Slot::Nested(settings) => Ok(&mut **settings),
            Slot::Scalar(_) => Err(SettingsError::NotNested(name.to_string())),
        }
    }

    // =========================================================================
    // Write
    // =========================================================================

    /// Validate and store a single value.
    ///
    /// Names that are not declared fields are kept as incidental attributes
    /// (see [`attribute`](Settings::attribute)) without validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the value fails the field's validation; the
    ///   previous value is kept
    /// - [`SettingsError::NestedOverride`] if `name` is a nested settings field
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let Some(index) = self.schema.position(name) else {
            debug!("Setting attribute '{name}' on '{}'", self.schema.name());
            self.attributes.insert(name.to_string(), value);
            return Ok(());
        };

        match &mut self.values[index] {
            Slot::Nested(_) => Err(SettingsError::NestedOverride(name.to_string()).into()),
            Slot::Scalar(slot) => {
                *slot = self.schema.field_at(index).validate(value)?;
                Ok(())
            }
        }
    }

    // =========================================================================
    // Bulk Update
    // =========================================================================

    /// Apply a key-value tree to the declared fields.
    ///
    /// Fields are processed in schema order. An absent or `null` entry leaves
    /// the current value alone, unless the field is required and this is not a
    /// partial update. Nested mappings are applied to the existing nested
    /// settings and always require all of their own required fields.
    ///
    /// Keys that are not declared fields are ignored.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::MissingField`] for the first required field missing
    /// - [`SettingsError::InvalidValue`] for the first value that fails
    ///   validation, wrapping the [`ValidationError`]
    /// - [`SettingsError::Nested`] wrapping a failure inside a nested mapping
    ///
    /// The update stops at the first error; fields already written by this
    /// call keep their new values.
    pub fn from_mapping(
        &mut self,
        data: &Map<String, Value>,
        partial_update: bool,
    ) -> std::result::Result<(), SettingsError> {
        debug!(
            "Updating '{}' from {} key(s) (partial: {partial_update})",
            self.schema.name(),
            data.len()
        );

        for ((name, field), slot) in self.schema.fields().zip(self.values.iter_mut()) {
            let Some(raw) = data.get(name).filter(|v| !v.is_null()) else {
                if field.is_required() && !partial_update {
                    return Err(SettingsError::MissingField(name.to_string()));
                }
                continue;
            };

            let invalid = |source: ValidationError| SettingsError::InvalidValue {
                field: name.to_string(),
                value: raw.clone(),
                source,
            };
            let value = field.validate(raw.clone()).map_err(invalid)?;

            match (slot, value) {
                (Slot::Scalar(current), value) => *current = value,
                (Slot::Nested(settings), Value::Object(map)) => {
                    settings
                        .from_mapping(&map, false)
                        .map_err(|e| SettingsError::Nested {
                            field: name.to_string(),
                            source: Box::new(e),
                        })?;
                }
                (Slot::Nested(_), other) => {
                    return Err(invalid(ValidationError::TypeMismatch {
                        expected: ValueKind::Mapping,
                        actual: ValueKind::of(&other),
                    }));
                }
            }
        }
        Ok(())
    }

    /// Apply any tree whose root must be a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotAMapping`] if `data` is not an object, or
    /// any error from [`from_mapping`](Settings::from_mapping).
    pub fn update(
        &mut self,
        data: &Value,
        partial_update: bool,
    ) -> std::result::Result<(), SettingsError> {
        match data {
            Value::Object(map) => self.from_mapping(map, partial_update),
            other => Err(SettingsError::NotAMapping(ValueKind::of(other))),
        }
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Export current values as a plain tree in schema order.
    ///
    /// Nested settings are exported recursively; incidental attributes are not
    /// part of the export.
    pub fn to_mapping(&self) -> Map<String, Value> {
        self.schema
            .field_names()
            .zip(&self.values)
            .map(|(name, slot)| {
                let value = match slot {
                    Slot::Scalar(value) => value.clone(),
                    Slot::Nested(settings) => settings.to_value(),
                };
                (name.to_string(), value)
            })
            .collect()
    }

    /// [`to_mapping`](Settings::to_mapping) wrapped as a [`Value`]
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_mapping())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Schema;
    use crate::fields::{Email, Field, Integer, Text};
    use serde_json::json;
    use std::sync::Arc;

    fn simple_schema() -> Arc<Schema> {
        Schema::builder("Simple")
            .field("var1", Integer::field())
            .field("var2", Integer::field().optional().with_default(12))
            .build()
            .unwrap()
    }

    fn outer_schema() -> Arc<Schema> {
        Schema::builder("Outer")
            .field("var1", Integer::field())
            .nested("inner", Settings::new(simple_schema()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_holds_defaults() {
        let settings = Settings::new(simple_schema());
        assert_eq!(settings.get("var1").unwrap().as_value(), Some(&json!(0)));
        assert_eq!(settings.get("var2").unwrap().as_value(), Some(&json!(12)));
    }

    #[test]
    fn test_get_unknown_field() {
        let settings = Settings::new(simple_schema());
        let err = settings.get("missing").unwrap_err();
        assert!(matches!(err, SettingsError::UnknownField { .. }));
    }

    #[test]
    fn test_set_validates_and_keeps_previous_on_failure() {
        let mut settings = Settings::new(simple_schema());
        settings.set("var1", 10).unwrap();
        assert_eq!(settings.value::<i64>("var1").unwrap(), 10);

        let err = settings.set("var1", "not_a_number").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::TypeMismatch { .. })));
        assert_eq!(settings.value::<i64>("var1").unwrap(), 10);
    }

    #[test]
    fn test_set_undeclared_is_incidental_attribute() {
        let mut settings = Settings::new(simple_schema());
        settings.set("note", "free text").unwrap();

        assert_eq!(settings.attribute("note"), Some(&json!("free text")));
        assert!(settings.get("note").is_err());
        assert!(!settings.to_mapping().contains_key("note"));
    }

    #[test]
    fn test_set_nested_is_rejected() {
        let mut settings = Settings::new(outer_schema());
        let err = settings.set("inner", json!({"var1": 1})).unwrap_err();
        assert!(matches!(
            err,
            Error::Settings(SettingsError::NestedOverride(ref name)) if name == "inner"
        ));
    }

    #[test]
    fn test_nested_mut_changes_single_field() {
        let mut settings = Settings::new(outer_schema());
        settings.nested_mut("inner").unwrap().set("var1", 7).unwrap();
        assert_eq!(settings.nested("inner").unwrap().value::<i64>("var1").unwrap(), 7);

        assert_eq!(
            settings.nested("var1").unwrap_err(),
            SettingsError::NotNested("var1".into())
        );
        assert_eq!(
            settings.nested_mut("var1").unwrap_err(),
            SettingsError::NotNested("var1".into())
        );
        assert!(matches!(
            settings.nested_mut("absent").unwrap_err(),
            SettingsError::UnknownField { .. }
        ));
    }

    #[test]
    fn test_from_mapping_null_counts_as_missing() {
        let mut settings = Settings::new(simple_schema());
        let data = json!({"var1": null, "var2": 3});

        let err = settings.update(&data, false).unwrap_err();
        assert_eq!(err, SettingsError::MissingField("var1".into()));

        settings.update(&data, true).unwrap();
        assert_eq!(settings.value::<i64>("var1").unwrap(), 0);
        assert_eq!(settings.value::<i64>("var2").unwrap(), 3);
    }

    #[test]
    fn test_update_requires_mapping_root() {
        let mut settings = Settings::new(simple_schema());
        let err = settings.update(&json!([1, 2]), false).unwrap_err();
        assert_eq!(err, SettingsError::NotAMapping(ValueKind::Array));
    }

    #[test]
    fn test_nested_value_must_be_mapping() {
        let mut settings = Settings::new(outer_schema());
        let err = settings
            .update(&json!({"var1": 1, "inner": 5}), false)
            .unwrap_err();

        match err {
            SettingsError::InvalidValue { field, source, .. } => {
                assert_eq!(field, "inner");
                assert!(source.is_type_mismatch());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nested_failure_carries_path() {
        let mut settings = Settings::new(outer_schema());
        let err = settings
            .update(&json!({"var1": 1, "inner": {"var2": 2}}), false)
            .unwrap_err();

        assert_eq!(err.field_path().as_deref(), Some("inner.var1"));
        assert_eq!(err.innermost(), &SettingsError::MissingField("var1".into()));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut settings = Settings::new(simple_schema());
        settings
            .update(&json!({"var1": 1, "unexpected": true}), false)
            .unwrap();
        assert_eq!(settings.to_value(), json!({"var1": 1, "var2": 12}));
    }

    #[test]
    fn test_to_mapping_follows_schema_order() {
        let schema = Schema::builder("Ordered")
            .field("zeta", Text::field())
            .field("alpha", Email::field().optional())
            .build()
            .unwrap();
        let settings = Settings::new(schema);

        let keys: Vec<String> = settings.to_mapping().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
        assert_eq!(settings.to_value(), json!({"zeta": "", "alpha": null}));
    }

    #[test]
    fn test_nested_default_applies_to_template() {
        let schema = Schema::builder("WithNestedDefault")
            .field(
                "inner",
                Field::nested(Settings::new(simple_schema())).with_default(json!({"var2": 40})),
            )
            .build()
            .unwrap();

        let settings = Settings::new(schema);
        assert_eq!(
            settings.get("inner").unwrap().to_value(),
            json!({"var1": 0, "var2": 40})
        );
    }
}
