//! Storage backend trait and implementations

use crate::error::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

/// Trait for storage backend implementations
///
/// Backends turn a settings tree into text and back. They know nothing about
/// schemas; validation happens when the parsed tree is applied to settings.
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this storage format (e.g., "json", "yaml")
    fn extension(&self) -> &str;

    /// Serialize data to string
    fn serialize<T: Serialize>(&self, data: &T) -> Result<String>;

    /// Deserialize data from string
    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T>;

    /// Read and deserialize from file
    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.deserialize(&content)
    }

    /// Serialize and write to file
    ///
    /// Uses atomic write: writes to temp file then renames to prevent corruption.
    fn write<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let content = self.serialize(data)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // Use .tmp suffix append to preserve original filename fully
        let file_name = path.file_name().ok_or_else(|| {
            Error::UnsupportedFormat(format!(
                "Invalid path '{}': must have a filename",
                path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// =============================================================================
// JSON Storage Implementation
// =============================================================================

/// JSON storage backend (default)
#[derive(Clone, Debug)]
pub struct JsonStorage {
    /// Pretty print JSON output
    pretty: bool,
}

impl Default for JsonStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStorage {
    /// Create a new JSON storage backend with pretty printing enabled
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON storage (no pretty printing)
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        let result = if self.pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        result.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        serde_json::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }
}

// =============================================================================
// YAML Storage Implementation
// =============================================================================

/// YAML storage backend
///
/// Loading is safe-only: explicitly tagged nodes (`!tag value`) are rejected
/// instead of being interpreted.
#[cfg(feature = "yaml")]
#[derive(Clone, Debug, Default)]
pub struct YamlStorage;

#[cfg(feature = "yaml")]
impl YamlStorage {
    pub fn new() -> Self {
        Self
    }

    fn reject_tags(value: &serde_yaml::Value) -> Result<()> {
        use serde_yaml::Value;

        match value {
            Value::Tagged(tagged) => Err(Error::Parse(format!(
                "YAML tag '{}' is not allowed in settings files",
                tagged.tag
            ))),
            Value::Sequence(items) => items.iter().try_for_each(Self::reject_tags),
            Value::Mapping(map) => map.iter().try_for_each(|(key, value)| {
                Self::reject_tags(key)?;
                Self::reject_tags(value)
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(feature = "yaml")]
impl StorageBackend for YamlStorage {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        serde_yaml::to_string(data).map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| Error::Parse(e.to_string()))?;
        Self::reject_tags(&value)?;
        T::deserialize(value).map_err(|e| Error::Parse(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::{Value, json};
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_json_serialize_pretty() {
        let storage = JsonStorage::new();
        let data = TestData {
            name: "test".into(),
            value: 42,
        };

        let json = storage.serialize(&data).unwrap();
        assert!(json.contains('\n')); // Pretty printed
        assert!(json.contains("\"name\": \"test\""));
    }

    #[test]
    fn test_json_serialize_compact() {
        let storage = JsonStorage::compact();
        let data = TestData {
            name: "test".into(),
            value: 42,
        };

        let json = storage.serialize(&data).unwrap();
        assert!(!json.contains('\n')); // Compact
    }

    #[test]
    fn test_json_keeps_key_order() {
        let storage = JsonStorage::compact();
        let mut map = serde_json::Map::new();
        map.insert("zeta".into(), json!(1));
        map.insert("alpha".into(), json!(2));

        let json = storage.serialize(&map).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn test_json_roundtrip_creates_parent_dirs() {
        let storage = JsonStorage::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("subdir/test.json");

        let data = TestData {
            name: "hello".into(),
            value: 123,
        };

        storage.write(&path, &data).unwrap();
        let loaded: TestData = storage.read(&path).unwrap();

        assert_eq!(data, loaded);
        assert!(!dir.path().join("subdir/test.json.tmp").exists());
    }

    #[test]
    fn test_json_malformed_is_parse_error() {
        let storage = JsonStorage::new();
        let result: Result<Value> = storage.deserialize("{\"var1\": ");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let storage = JsonStorage::new();
        let result: Result<TestData> = storage.read(Path::new("/nonexistent/file.json"));

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::FileRead { .. }));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_roundtrip() {
        let storage = YamlStorage::new();
        let data = json!({"var1": 1, "nested": {"flag": true, "ratio": 0.5}});

        let text = storage.serialize(&data).unwrap();
        let loaded: Value = storage.deserialize(&text).unwrap();
        assert_eq!(loaded, data);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_rejects_tags() {
        let storage = YamlStorage::new();
        let result: Result<Value> = storage.deserialize("var1: !custom 5\n");
        assert!(matches!(result, Err(Error::Parse(ref msg)) if msg.contains("custom")));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_malformed_is_parse_error() {
        let storage = YamlStorage::new();
        let result: Result<Value> = storage.deserialize("var1: [1, 2\n");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
