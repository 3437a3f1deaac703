//! Settings file location and format

use crate::error::{Error, Result};
use crate::storage::JsonStorage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serialization format of a settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
}

impl Format {
    /// File extension written for this format
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            #[cfg(feature = "yaml")]
            Format::Yaml => "yaml",
        }
    }

    /// Detect the format from a path's extension
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Format::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Where a settings file lives and how it is written
#[derive(Debug, Clone)]
pub struct SettingsFile {
    /// Directory holding the file
    pub config_dir: PathBuf,

    /// File name without extension (e.g., "settings")
    pub file_stem: String,

    pub format: Format,

    /// Pretty-print JSON output
    pub pretty_json: bool,

    /// Extension of an existing file, kept as written (e.g. "yml", "JSON")
    extension: Option<String>,
}

impl SettingsFile {
    /// Create a new builder for SettingsFile
    ///
    /// # Example
    /// ```rust
    /// use schemaconf::{Format, SettingsFile};
    ///
    /// let file = SettingsFile::builder("my-app")
    ///     .config_dir("/etc/my-app")
    ///     .format(Format::Json)
    ///     .build();
    ///
    /// assert_eq!(file.path(), std::path::PathBuf::from("/etc/my-app/settings.json"));
    /// ```
    pub fn builder(app_name: impl Into<String>) -> SettingsFileBuilder {
        SettingsFileBuilder::new(app_name)
    }

    /// Describe an existing file, detecting the format from its extension
    ///
    /// The extension is kept as written, so [`path`](SettingsFile::path)
    /// resolves back to the same file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if the extension is not recognized.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let file_stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?
            .to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string);

        Ok(Self {
            config_dir: path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            file_stem,
            format,
            pretty_json: true,
            extension,
        })
    }

    /// Get the full path to the settings file
    pub fn path(&self) -> PathBuf {
        let extension = self
            .extension
            .as_deref()
            .unwrap_or_else(|| self.format.extension());
        self.config_dir
            .join(format!("{}.{}", self.file_stem, extension))
    }

    pub(crate) fn json_storage(&self) -> JsonStorage {
        if self.pretty_json {
            JsonStorage::new()
        } else {
            JsonStorage::compact()
        }
    }
}

/// Builder for creating SettingsFile with a fluent API
#[derive(Debug, Clone)]
pub struct SettingsFileBuilder {
    app_name: String,
    config_dir: Option<PathBuf>,
    file_stem: String,
    format: Format,
    pretty_json: bool,
}

impl SettingsFileBuilder {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            config_dir: None,
            file_stem: "settings".into(),
            format: Format::default(),
            pretty_json: true,
        }
    }

    /// Set the configuration directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = match (path.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => path,
        };
        self.config_dir = Some(expanded);
        self
    }

    /// Set the file name without extension (default: "settings")
    pub fn file_name(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Use compact JSON (no pretty printing)
    pub fn compact_json(mut self) -> Self {
        self.pretty_json = false;
        self
    }

    /// Build the SettingsFile
    ///
    /// If `config_dir` is not set, uses the system config directory for the app.
    pub fn build(self) -> SettingsFile {
        let config_dir = self.config_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(&self.app_name))
                .unwrap_or_else(|| PathBuf::from("."))
        });

        SettingsFile {
            config_dir,
            file_stem: self.file_stem,
            format: self.format,
            pretty_json: self.pretty_json,
            extension: None,
        }
    }
}
