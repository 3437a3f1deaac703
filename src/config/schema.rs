//! Settings schemas and class definitions
//!
//! # Overview
//!
//! A [`Schema`] is the ordered field table of a settings class: field name to
//! [`Field`] definition, computed once when the class is first used.
//!
//! - **Ordered**: fields keep declaration order, which is also the order used
//!   for bulk updates and exports
//! - **Inherited**: a schema can extend one or more ancestor schemas; own
//!   declarations override inherited ones of the same name
//! - **Immutable**: once built, a schema is shared behind an `Arc` and never
//!   changes
//!
//! # Defining Classes
//!
//! The [`settings!`](crate::settings!) macro defines a settings class: a newtype
//! over [`Settings`] with its schema built once per class.
//!
//! ```rust
//! use schemaconf::{settings, Integer, Text, SettingsSchema};
//!
//! settings! {
//!     /// Connection settings
//!     pub struct Connection {
//!         host: Text::field(),
//!         port: Integer::field().optional().with_default(5432),
//!     }
//! }
//!
//! settings! {
//!     /// Connection with credentials
//!     pub struct AuthConnection: Connection {
//!         user: Text::field(),
//!     }
//! }
//!
//! let schema = AuthConnection::schema();
//! let names: Vec<&str> = schema.field_names().collect();
//! assert_eq!(names, ["host", "port", "user"]);
//! ```
//!
//! # Building Schemas at Runtime
//!
//! The same table can be assembled without the macro:
//!
//! ```rust
//! use schemaconf::{Boolean, Schema, Settings, Text};
//!
//! let schema = Schema::builder("Feature")
//!     .field("name", Text::field())
//!     .field("enabled", Boolean::field().optional().with_default(true))
//!     .build()?;
//!
//! let feature = Settings::new(schema);
//! assert_eq!(feature.get("enabled")?.as_value(), Some(&serde_json::json!(true)));
//! # Ok::<(), schemaconf::SettingsError>(())
//! ```

use crate::error::{SettingsError, ValidationError};
use crate::fields::Field;
use crate::settings::Settings;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// Schema
// =============================================================================

/// Ordered field table of a settings class
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<(String, Field)>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Start building a schema for a class called `name`
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Class name the schema was built for
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a field definition by name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.position(name).map(|i| &self.fields[i].1)
    }

    /// Field at a position returned by [`position`](Schema::position)
    pub(crate) fn field_at(&self, index: usize) -> &Field {
        &self.fields[index].1
    }

    /// Position of a field in declaration order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterate over `(name, field)` pairs in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Iterate over field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

// =============================================================================
// Schema Builder
// =============================================================================

/// Anything that can be declared as a field
///
/// Implemented for [`Field`] and for the `Result` returned by
/// [`Field::with_default`], so a failed default surfaces when the schema is
/// built.
pub trait IntoField {
    fn into_field(self) -> Result<Field, ValidationError>;
}

impl IntoField for Field {
    fn into_field(self) -> Result<Field, ValidationError> {
        Ok(self)
    }
}

impl IntoField for Result<Field, ValidationError> {
    fn into_field(self) -> Result<Field, ValidationError> {
        self
    }
}

/// Builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<(String, Field)>,
    index: HashMap<String, usize>,
    error: Option<SettingsError>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            index: HashMap::new(),
            error: None,
        }
    }

    /// Merge in every field of an ancestor schema
    ///
    /// Call once per ancestor, base classes first: later merges and own
    /// declarations override earlier entries of the same name.
    pub fn extends(mut self, parent: &Schema) -> Self {
        for (name, field) in parent.fields() {
            self.insert(name.to_string(), field.clone());
        }
        self
    }

    /// Declare a field, overriding any inherited field of the same name
    pub fn field(mut self, name: impl Into<String>, field: impl IntoField) -> Self {
        let name = name.into();
        match field.into_field() {
            Ok(field) => self.insert(name, field),
            Err(source) => {
                // Keep the first failure; later declarations cannot fix it
                if self.error.is_none() {
                    self.error = Some(SettingsError::InvalidDefault {
                        settings: self.name.clone(),
                        field: name,
                        source,
                    });
                }
            }
        }
        self
    }

    /// Declare a nested settings field from a template instance
    pub fn nested(self, name: impl Into<String>, template: Settings) -> Self {
        self.field(name, Field::nested(template))
    }

    /// Overriding keeps the inherited position
    fn insert(&mut self, name: String, field: Field) {
        match self.index.get(&name) {
            Some(&i) => self.fields[i].1 = field,
            None => {
                self.index.insert(name.clone(), self.fields.len());
                self.fields.push((name, field));
            }
        }
    }

    /// Finish the schema
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidDefault`] if a declared field's default
    /// did not pass its own validation.
    pub fn build(self) -> Result<Arc<Schema>, SettingsError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        debug!(
            "Built settings schema '{}' with {} field(s)",
            self.name,
            self.fields.len()
        );
        Ok(Arc::new(Schema {
            name: self.name,
            fields: self.fields,
            index: self.index,
        }))
    }
}

// =============================================================================
// Settings Schema Trait
// =============================================================================

/// A settings class: a typed handle over [`Settings`] with a fixed schema.
///
/// Usually implemented through the [`settings!`](crate::settings!) macro,
/// which caches the schema so it is computed once per class.
pub trait SettingsSchema: Sized {
    /// Effective schema of the class, including inherited fields
    fn schema() -> Arc<Schema>;

    /// Wrap an instance built from this class's schema
    fn from_settings(settings: Settings) -> Self;

    /// Unwrap into the untyped settings node
    fn into_settings(self) -> Settings;

    /// Fresh instance holding defaults
    fn new() -> Self {
        Self::from_settings(Settings::new(Self::schema()))
    }

    /// Required field nesting this class inside another one
    fn field() -> Field {
        Field::nested(Self::new().into_settings())
    }
}

/// Define a settings class.
///
/// Generates a newtype over [`Settings`] implementing [`SettingsSchema`],
/// `Default`, `Deref`/`DerefMut` to `Settings`, and `From<Class> for Field`.
/// Ancestor classes go after a colon; their fields are merged in order, then
/// the class's own declarations override them.
///
/// Each declaration is an expression producing a [`Field`] (or the `Result`
/// of [`Field::with_default`]). Non-field members are added with an ordinary
/// `impl` block on the generated type.
///
/// Field declarations take no attributes or doc comments; document fields on
/// the class itself.
///
/// ```compile_fail
/// use schemaconf::{settings, Integer, SettingsSchema};
///
/// settings! {
///     pub struct Documented {
///         /// Not accepted here
///         port: Integer::field(),
///     }
/// }
/// ```
///
/// # Panics
///
/// The generated `schema()` panics on first use if a declared default fails
/// its field's validation. That is a bug in the class definition.
///
/// # Example
///
/// ```rust
/// use schemaconf::{settings, Integer, SettingsSchema};
///
/// settings! {
///     pub struct Scaling {
///         factor: Integer::field(),
///     }
/// }
///
/// impl Scaling {
///     const MULTIPLIER: i64 = 2;
///
///     fn scaled(&self) -> schemaconf::Result<i64> {
///         Ok(self.value::<i64>("factor")? * Self::MULTIPLIER)
///     }
/// }
///
/// let mut scaling = Scaling::new();
/// scaling.set("factor", 5)?;
/// assert_eq!(scaling.scaled()?, 10);
/// # Ok::<(), schemaconf::Error>(())
/// ```
#[macro_export]
macro_rules! settings {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: $($parent:ty),+ )? {
            $( $field:ident : $decl:expr ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name($crate::Settings);

        impl $crate::SettingsSchema for $name {
            fn schema() -> ::std::sync::Arc<$crate::Schema> {
                static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<$crate::Schema>> =
                    ::std::sync::OnceLock::new();
                SCHEMA
                    .get_or_init(|| {
                        $crate::Schema::builder(stringify!($name))
                            $($( .extends(&<$parent as $crate::SettingsSchema>::schema()) )+)?
                            $( .field(stringify!($field), $decl) )*
                            .build()
                            .unwrap_or_else(|e| panic!("invalid settings class: {e}"))
                    })
                    .clone()
            }

            fn from_settings(settings: $crate::Settings) -> Self {
                Self(settings)
            }

            fn into_settings(self) -> $crate::Settings {
                self.0
            }
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                <Self as $crate::SettingsSchema>::new()
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::Settings;

            fn deref(&self) -> &$crate::Settings {
                &self.0
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut $crate::Settings {
                &mut self.0
            }
        }

        impl ::std::convert::From<$name> for $crate::Field {
            fn from(settings: $name) -> Self {
                $crate::Field::nested(settings.0)
            }
        }
    };
}

// =============================================================================
// Tests
// =============================================================================
