//! Error types for schemaconf
//!
//! Three layers, never conflated:
//!
//! - [`ValidationError`] - a single value failed a field's type or format rule
//! - [`SettingsError`] - a settings node was misused or a bulk update failed
//! - [`Error`] - crate-level error that also covers file I/O and parsing

use crate::fields::ValueKind;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for schemaconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Raised by a field's `validate` when a value does not satisfy it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("PositiveInteger value must be greater than 0, got {0}")]
    NotPositive(Value),

    #[error("Provided string is not a valid email.")]
    InvalidEmail,

    #[error("Provided string is not a valid url.")]
    InvalidUrl,

    /// Reason reported by a user-defined validator
    #[error("{0}")]
    Custom(String),
}

impl ValidationError {
    /// Create an error carrying a free-form reason (for custom validators)
    pub fn custom(reason: impl Into<String>) -> Self {
        Self::Custom(reason.into())
    }

    /// Check if the value had the wrong kind altogether
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// Raised by settings node operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Missing required value: {0}")]
    MissingField(String),

    #[error("Value {value} for field \"{field}\" did not pass validation checks: {source}")]
    InvalidValue {
        field: String,
        value: Value,
        #[source]
        source: ValidationError,
    },

    #[error(
        "Overriding nested settings \"{0}\" directly is not allowed, use from_mapping() instead"
    )]
    NestedOverride(String),

    #[error("'{settings}' has no field named '{field}'")]
    UnknownField { settings: String, field: String },

    #[error("Field \"{0}\" holds a plain value, not nested settings")]
    NotNested(String),

    #[error("Settings data must be a mapping, got {0}")]
    NotAMapping(ValueKind),

    #[error("Default value for field \"{field}\" of '{settings}' is invalid: {source}")]
    InvalidDefault {
        settings: String,
        field: String,
        #[source]
        source: ValidationError,
    },

    #[error("Invalid nested settings \"{field}\": {source}")]
    Nested {
        field: String,
        #[source]
        source: Box<SettingsError>,
    },
}

impl SettingsError {
    /// Follow `Nested` wrappers down to the error that actually occurred
    #[must_use]
    pub fn innermost(&self) -> &SettingsError {
        match self {
            Self::Nested { source, .. } => source.innermost(),
            other => other,
        }
    }

    /// Dotted path of the field the error refers to, when there is one
    #[must_use]
    pub fn field_path(&self) -> Option<String> {
        match self {
            Self::Nested { field, source } => Some(match source.field_path() {
                Some(rest) => format!("{field}.{rest}"),
                None => field.clone(),
            }),
            Self::MissingField(field)
            | Self::InvalidValue { field, .. }
            | Self::NestedOverride(field)
            | Self::UnknownField { field, .. }
            | Self::NotNested(field)
            | Self::InvalidDefault { field, .. } => Some(field.clone()),
            Self::NotAMapping(_) => None,
        }
    }
}

/// Main error type for schemaconf
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Validation / Settings Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Cannot convert field '{field}': {source}")]
    Convert {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error("Unsupported settings file format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Check if this error came from a field or settings rule rather than I/O
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Settings(_))
    }

    /// Check if this is a malformed-input error from a serialization backend
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_value_message_names_field_and_value() {
        let err = SettingsError::InvalidValue {
            field: "port".into(),
            value: json!("abc"),
            source: ValidationError::TypeMismatch {
                expected: ValueKind::Integer,
                actual: ValueKind::String,
            },
        };

        let msg = err.to_string();
        assert!(msg.contains("\"port\""));
        assert!(msg.contains("\"abc\""));
        assert!(msg.contains("Type mismatch"));
    }

    #[test]
    fn test_nested_path_and_innermost() {
        let err = SettingsError::Nested {
            field: "app".into(),
            source: Box::new(SettingsError::Nested {
                field: "auth".into(),
                source: Box::new(SettingsError::MissingField("key".into())),
            }),
        };

        assert_eq!(err.field_path().as_deref(), Some("app.auth.key"));
        assert_eq!(err.innermost(), &SettingsError::MissingField("key".into()));
    }

    #[test]
    fn test_error_classification() {
        let err: Error = ValidationError::InvalidEmail.into();
        assert!(err.is_validation_error());
        assert!(!err.is_parse_error());

        let err = Error::Parse("unexpected end of input".into());
        assert!(err.is_parse_error());
        assert!(!err.is_validation_error());
    }
}
