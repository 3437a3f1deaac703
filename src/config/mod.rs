//! Schema and file configuration types
//!
//! This module contains the definition-time side of settings management:
//! - `Schema` / `SchemaBuilder` - Ordered field table of a settings class
//! - `SettingsSchema` - Trait implemented by settings classes (see `settings!`)
//! - `SettingsFile` - Where a settings file lives and which format it uses

mod schema;
mod types;

pub use schema::{IntoField, Schema, SchemaBuilder, SettingsSchema};

pub use types::{Format, SettingsFile, SettingsFileBuilder};
