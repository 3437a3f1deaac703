//! Settings fields
//!
//! A [`Field`] is one configuration slot: a validator (or a nested settings
//! template), a `required` flag and a default value.
//!
//! # Validation Model
//!
//! Validation is type-driven and non-transforming. Every [`Validator`] names the
//! [`ValueKind`] it expects; the kind is checked first, then any extra rule the
//! validator adds. On success the value comes back unchanged:
//!
//! ```rust
//! use schemaconf::{Integer, PositiveInteger, Validator};
//! use serde_json::json;
//!
//! assert_eq!(Integer.validate(json!(2)).unwrap(), json!(2));
//! assert!(Integer.validate(json!("2")).is_err());   // type mismatch
//! assert!(PositiveInteger.validate(json!(0)).is_err()); // rule violation
//! ```
//!
//! # Custom Validators
//!
//! Implement [`Validator`] and wrap it with [`Field::new`]. Call the kind check
//! before the custom rule so type errors are reported first:
//!
//! ```rust
//! use schemaconf::{Field, ValidationError, Validator, ValueKind};
//! use serde_json::Value;
//!
//! #[derive(Debug)]
//! struct Port;
//!
//! impl Validator for Port {
//!     fn expected_kind(&self) -> ValueKind {
//!         ValueKind::Integer
//!     }
//!
//!     fn validate(&self, value: Value) -> Result<Value, ValidationError> {
//!         let value = self.expected_kind().check(value)?;
//!         match value.as_u64() {
//!             Some(1..=65535) => Ok(value),
//!             _ => Err(ValidationError::custom("port must be between 1 and 65535")),
//!         }
//!     }
//! }
//!
//! let port = Field::new(Port).with_default(8080).unwrap();
//! assert!(port.validate(serde_json::json!(70000)).is_err());
//! ```

mod types;

pub use types::{Boolean, Email, Float, Integer, PositiveInteger, Text, Url};

use crate::error::ValidationError;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Value Kinds
// =============================================================================

/// Semantic type of a value in the settings tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Mapping,
}

impl ValueKind {
    /// Classify a value
    ///
    /// Numbers that fit an integer representation are `Integer`, everything
    /// else numeric is `Float`. Booleans are never numbers.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Mapping,
        }
    }

    /// Return the value unchanged if it has this kind
    pub fn check(self, value: Value) -> Result<Value, ValidationError> {
        let actual = Self::of(&value);
        if actual == self {
            Ok(value)
        } else {
            Err(ValidationError::TypeMismatch {
                expected: self,
                actual,
            })
        }
    }

    /// Lowercase name used in messages
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Validator Trait
// =============================================================================

/// Validation capability shared by every scalar field variant.
///
/// The default `validate` only checks the kind. Variants that narrow the
/// accepted set override it, delegating to the parent rule first.
pub trait Validator: fmt::Debug + Send + Sync + 'static {
    /// Kind a value must have to be accepted
    fn expected_kind(&self) -> ValueKind;

    /// Check `value` and hand it back unchanged if it passes
    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        self.expected_kind().check(value)
    }

    /// Value a field holds when nothing explicit was declared
    ///
    /// `None` means the field starts out empty (`null`).
    fn implicit_default(&self) -> Option<Value> {
        None
    }
}

// =============================================================================
// Field
// =============================================================================

#[derive(Debug, Clone)]
pub(crate) enum FieldKind {
    Scalar(Arc<dyn Validator>),
    /// Template copied into every instance of the owning settings
    Nested(Box<Settings>),
}

/// A typed, validated configuration slot with a default and a required flag.
///
/// Fields are built once, when their settings schema is defined, and are not
/// changed afterwards.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) kind: FieldKind,
    required: bool,
    default: Option<Value>,
}

impl Field {
    /// Create a required field backed by a validator
    pub fn new(validator: impl Validator) -> Self {
        let default = validator.implicit_default();
        Self {
            kind: FieldKind::Scalar(Arc::new(validator)),
            required: true,
            default,
        }
    }

    /// Create a required field holding a nested settings node
    ///
    /// `template` is deep-copied into each instance of the owning settings, so
    /// instances never share nested state.
    pub fn nested(template: Settings) -> Self {
        Self {
            kind: FieldKind::Nested(Box::new(template)),
            required: true,
            default: None,
        }
    }

    /// Mark the field as optional
    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Set whether the field must be present in bulk updates
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set a default value, validating it immediately
    ///
    /// `null` means "no explicit default": the field keeps its implicit
    /// default (or its template, for nested fields).
    ///
    /// For nested fields the default must be a mapping; it is applied to the
    /// template as a partial update so every instance starts from it.
    pub fn with_default(mut self, value: impl Into<Value>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_null() {
            return Ok(self);
        }
        let value = self.validate(value)?;
        if let (FieldKind::Nested(template), Value::Object(map)) = (&mut self.kind, &value) {
            template
                .from_mapping(map, true)
                .map_err(|e| ValidationError::custom(e.to_string()))?;
        }
        self.default = Some(value);
        Ok(self)
    }

    /// Check `value` against this field
    ///
    /// Nested fields only accept mappings here; their contents are checked
    /// by the nested settings' bulk update.
    pub fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        match &self.kind {
            FieldKind::Scalar(validator) => validator.validate(value),
            FieldKind::Nested(_) => ValueKind::Mapping.check(value),
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Declared (or implicit) default value, if any
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Kind a value must have to be accepted by this field
    pub fn expected_kind(&self) -> ValueKind {
        match &self.kind {
            FieldKind::Scalar(validator) => validator.expected_kind(),
            FieldKind::Nested(_) => ValueKind::Mapping,
        }
    }

    /// Check if this field holds nested settings
    pub fn is_nested(&self) -> bool {
        matches!(self.kind, FieldKind::Nested(_))
    }

    /// Nested settings template, for nested fields
    pub fn template(&self) -> Option<&Settings> {
        match &self.kind {
            FieldKind::Nested(template) => Some(template),
            FieldKind::Scalar(_) => None,
        }
    }
}

impl<V: Validator> From<V> for Field {
    fn from(validator: V) -> Self {
        Field::new(validator)
    }
}

impl From<Settings> for Field {
    fn from(template: Settings) -> Self {
        Field::nested(template)
    }
}

// =============================================================================
// Tests
// =============================================================================
