use super::Settings;
use crate::config::{Format, SettingsFile};
use crate::error::Result;
use crate::storage::{JsonStorage, StorageBackend};
use log::info;
use serde_json::Value;
use std::path::Path;

#[cfg(feature = "yaml")]
use crate::storage::YamlStorage;

impl Settings {
    /// Read a file with `storage` and apply it as a full (non-partial) update.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The content is malformed for the storage format (`Error::Parse`)
    /// - The parsed tree fails the bulk update (`Error::Settings`)
    pub fn load<S: StorageBackend>(&mut self, storage: &S, path: &Path) -> Result<()> {
        let data: Value = storage.read(path)?;
        self.update(&data, false)?;
        info!(
            "Loaded '{}' settings from {}",
            self.schema.name(),
            path.display()
        );
        Ok(())
    }

    /// Export current values and write them with `storage`.
    ///
    /// Works on a fresh instance too, which produces a template file with
    /// every field at its default.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save<S: StorageBackend>(&self, storage: &S, path: &Path) -> Result<()> {
        storage.write(path, &self.to_value())?;
        info!(
            "Saved '{}' settings to {}",
            self.schema.name(),
            path.display()
        );
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn from_json(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load(&JsonStorage::new(), path.as_ref())
    }

    /// Save settings to a pretty-printed JSON file
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save(&JsonStorage::new(), path.as_ref())
    }

    /// Load settings from a YAML file (safe load, tags rejected)
    #[cfg(feature = "yaml")]
    pub fn from_yaml(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load(&YamlStorage::new(), path.as_ref())
    }

    /// Save settings to a YAML file
    #[cfg(feature = "yaml")]
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save(&YamlStorage::new(), path.as_ref())
    }

    /// Load from the location and format described by `file`
    pub fn load_file(&mut self, file: &SettingsFile) -> Result<()> {
        let path = file.path();
        match file.format {
            Format::Json => self.load(&file.json_storage(), &path),
            #[cfg(feature = "yaml")]
            Format::Yaml => self.load(&YamlStorage::new(), &path),
        }
    }

    /// Save to the location and format described by `file`
    pub fn save_file(&self, file: &SettingsFile) -> Result<()> {
        let path = file.path();
        match file.format {
            Format::Json => self.save(&file.json_storage(), &path),
            #[cfg(feature = "yaml")]
            Format::Yaml => self.save(&YamlStorage::new(), &path),
        }
    }
}
