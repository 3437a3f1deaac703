//! Built-in field variants

use super::{Field, ValueKind, Validator};
use crate::error::ValidationError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^https?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?",
        r"|localhost",
        r"|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("url pattern is valid")
});

macro_rules! field_constructor {
    ($($variant:ident),* $(,)?) => {
        $(
            impl $variant {
                /// Required field of this type with its implicit default
                pub fn field() -> Field {
                    Field::new($variant)
                }
            }
        )*
    };
}

field_constructor!(Integer, PositiveInteger, Text, Email, Boolean, Float, Url);

/// Whole numbers. Booleans and floats are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

impl Validator for Integer {
    fn expected_kind(&self) -> ValueKind {
        ValueKind::Integer
    }

    fn implicit_default(&self) -> Option<Value> {
        Some(Value::from(0))
    }
}

/// Natural numbers: integers strictly greater than zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositiveInteger;

impl Validator for PositiveInteger {
    fn expected_kind(&self) -> ValueKind {
        ValueKind::Integer
    }

    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        let value = Integer.validate(value)?;
        // Anything that only fits in u64 is above i64::MAX
        let positive = value.as_i64().map_or_else(|| value.is_u64(), |n| n > 0);
        if !positive {
            return Err(ValidationError::NotPositive(value));
        }
        Ok(value)
    }

    fn implicit_default(&self) -> Option<Value> {
        Some(Value::from(1))
    }
}

/// Text values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl Validator for Text {
    fn expected_kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn implicit_default(&self) -> Option<Value> {
        Some(Value::from(""))
    }
}

/// Email addresses, checked with a simple pattern rather than RFC 5322.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Validator for Email {
    fn expected_kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        let value = Text.validate(value)?;
        if !value.as_str().is_some_and(|s| EMAIL_RE.is_match(s)) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(value)
    }
}

/// Strict booleans; `0`/`1` are not accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Validator for Boolean {
    fn expected_kind(&self) -> ValueKind {
        ValueKind::Boolean
    }

    fn implicit_default(&self) -> Option<Value> {
        Some(Value::Bool(false))
    }
}

/// Floating-point numbers. Integer literals are a type mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Float;

impl Validator for Float {
    fn expected_kind(&self) -> ValueKind {
        ValueKind::Float
    }

    fn implicit_default(&self) -> Option<Value> {
        Some(Value::from(0.0))
    }
}

/// `http`/`https` URLs with a dotted host, `localhost` or an IPv4 address,
/// an optional port and an optional path or query.
///
/// Matching is case-insensitive and covers the whole string. A string that
/// fits the pattern passes even if it does not resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct Url;

impl Validator for Url {
    fn expected_kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        let value = Text.validate(value)?;
        if !value.as_str().is_some_and(|s| URL_RE.is_match(s)) {
            return Err(ValidationError::InvalidUrl);
        }
        Ok(value)
    }
}
