//! Settings nodes
//!
//! A [`Settings`] value is an instance of a [`Schema`]: it holds the current
//! value of every declared field, owning its nested settings exclusively.
//!
//! ## Access
//!
//! - [`get`](Settings::get) / [`value`](Settings::value) read a declared field
//! - [`set`](Settings::set) validates and writes one scalar field
//! - [`from_mapping`](Settings::from_mapping) applies a whole key-value tree
//! - [`to_mapping`](Settings::to_mapping) exports a plain, serializable tree
//!
//! Nested settings can only be replaced through bulk updates; use
//! [`nested_mut`](Settings::nested_mut) to change single nested fields.
//!
//! ## Not atomic
//!
//! A bulk update writes fields one at a time in schema order and stops at the
//! first failure. Fields written before the failure keep their new values.
//! Instances are not safe for concurrent mutation without external locking.

mod io;
mod operations;

use crate::config::Schema;
use crate::fields::FieldKind;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Current value of one declared field
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Scalar(Value),
    Nested(Box<Settings>),
}

/// Borrowed view of a declared field's current value
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    Value(&'a Value),
    Nested(&'a Settings),
}

impl<'a> FieldRef<'a> {
    /// Scalar value, or `None` for nested settings
    pub fn as_value(&self) -> Option<&'a Value> {
        match *self {
            FieldRef::Value(value) => Some(value),
            FieldRef::Nested(_) => None,
        }
    }

    /// Nested settings, or `None` for scalars
    pub fn as_nested(&self) -> Option<&'a Settings> {
        match *self {
            FieldRef::Nested(settings) => Some(settings),
            FieldRef::Value(_) => None,
        }
    }

    /// Plain tree form: the value itself, or the nested settings exported
    pub fn to_value(&self) -> Value {
        match *self {
            FieldRef::Value(value) => value.clone(),
            FieldRef::Nested(settings) => settings.to_value(),
        }
    }
}

/// Instance of a settings schema
///
/// `Clone` is a deep copy of all current values, including nested settings;
/// only the immutable schema is shared.
#[derive(Debug, Clone)]
pub struct Settings {
    schema: Arc<Schema>,
    /// Parallel to the schema's field table
    values: Vec<Slot>,
    /// Incidental attributes that are not declared fields
    attributes: HashMap<String, Value>,
}

impl Settings {
    /// Create an instance holding defaults
    ///
    /// Scalar fields start at their default (`null` when they have none);
    /// nested fields get their own deep copy of the declared template.
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = schema
            .fields()
            .map(|(_, field)| match &field.kind {
                FieldKind::Nested(template) => Slot::Nested(template.clone()),
                FieldKind::Scalar(_) => {
                    Slot::Scalar(field.default_value().cloned().unwrap_or(Value::Null))
                }
            })
            .collect();

        Self {
            schema,
            values,
            attributes: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Declared field names in schema order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.schema.field_names()
    }

    /// Read an incidental (non-field) attribute set through [`set`](Settings::set)
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}
