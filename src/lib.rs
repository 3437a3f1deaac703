//! # schemaconf - declarative, validated settings
//!
//! Define a schema of typed fields (and nested settings), then load, validate,
//! update and save configuration values against it.
//!
//! ## Features
//!
//! - **Typed Fields**: `Integer`, `PositiveInteger`, `Text`, `Email`, `Boolean`,
//!   `Float`, `Url`, or your own [`Validator`]
//! - **Required / Optional / Default**: every field declares whether bulk updates
//!   must provide it and what value a fresh instance holds
//! - **Nested Settings**: settings classes nest inside each other; every instance
//!   owns an independent copy of its nested settings
//! - **Inheritance**: a class extends ancestor classes and may override their
//!   field definitions
//! - **Partial Updates**: apply only part of a tree without tripping over
//!   required fields
//! - **JSON & YAML**: thin file adapters over a generic key-value tree
//!
//! ## Quick Start
//!
//! ```rust
//! use schemaconf::{settings, Integer, SettingsSchema, Text, Url};
//! use serde_json::json;
//!
//! settings! {
//!     /// Database connection
//!     pub struct Database {
//!         host: Url::field(),
//!         port: Integer::field().optional().with_default(5432),
//!     }
//! }
//!
//! settings! {
//!     pub struct AppSettings {
//!         name: Text::field(),
//!         database: Database::field(),
//!     }
//! }
//!
//! let mut app = AppSettings::new();
//! app.from_mapping(
//!     json!({"name": "demo", "database": {"host": "http://localhost"}})
//!         .as_object()
//!         .unwrap(),
//!     false,
//! )?;
//!
//! assert_eq!(
//!     app.to_value(),
//!     json!({"name": "demo", "database": {"host": "http://localhost", "port": 5432}})
//! );
//! # Ok::<(), schemaconf::SettingsError>(())
//! ```
//!
//! ## Reading and Writing Single Fields
//!
//! ```rust
//! # use schemaconf::{settings, Integer, SettingsSchema};
//! # settings! { pub struct Limits { max_items: Integer::field() } }
//! let mut limits = Limits::new();
//! limits.set("max_items", 50)?;
//! assert_eq!(limits.value::<i64>("max_items")?, 50);
//!
//! // Rejected values leave the previous one in place
//! assert!(limits.set("max_items", "fifty").is_err());
//! assert_eq!(limits.value::<i64>("max_items")?, 50);
//! # Ok::<(), schemaconf::Error>(())
//! ```
//!
//! ## Files
//!
//! ```rust,no_run
//! # use schemaconf::{settings, Integer, SettingsSchema, SettingsFile, Format};
//! # settings! { pub struct Limits { max_items: Integer::field() } }
//! let mut limits = Limits::new();
//! limits.from_json("limits.json")?;
//! limits.to_yaml("limits.yaml")?;
//!
//! // Or let the file locator decide where the file lives
//! let file = SettingsFile::builder("my-app").format(Format::Yaml).build();
//! limits.save_file(&file)?;
//! # Ok::<(), schemaconf::Error>(())
//! ```

mod error;
mod fields;
mod settings;
pub mod storage;

// Grouped modules
pub mod config;

// Re-exports from core
pub use error::{Error, Result, SettingsError, ValidationError};
pub use fields::{
    Boolean, Email, Field, Float, Integer, PositiveInteger, Text, Url, Validator, ValueKind,
};
pub use settings::{FieldRef, Settings};
pub use storage::{JsonStorage, StorageBackend};

#[cfg(feature = "yaml")]
pub use storage::YamlStorage;

// Re-exports from config
pub use config::{
    Format, IntoField, Schema, SchemaBuilder, SettingsFile, SettingsFileBuilder, SettingsSchema,
};
