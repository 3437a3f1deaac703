//! Common test utilities for schemaconf integration tests
//!
//! Provides shared settings classes, fixtures, and helper functions.

#![allow(dead_code)]

use schemaconf::{
    settings, Boolean, Email, Float, Integer, PositiveInteger, SettingsSchema, Text, Url,
};
use std::path::PathBuf;
use tempfile::TempDir;

pub const DEFAULT_INT: i64 = 12;

// =============================================================================
// Test Settings Classes
// =============================================================================

settings! {
    /// One required and one optional field
    pub struct MySettings {
        var1: Integer::field(),
        var2: Integer::field().optional().with_default(DEFAULT_INT),
    }
}

settings! {
    /// Settings with embedded settings
    pub struct MySettings2 {
        var1: Integer::field(),
        my_settings: MySettings::field(),
    }
}

settings! {
    /// Settings with inheritance
    pub struct MySettings3: MySettings {
        var3: Text::field(),
    }
}

settings! {
    /// Overrides an inherited field definition
    pub struct RelaxedSettings: MySettings {
        var1: Integer::field().optional().with_default(99),
    }
}

settings! {
    /// Settings with an additional non-field member
    pub struct AdditionalMemberSettings {
        var: Integer::field(),
    }
}

impl AdditionalMemberSettings {
    pub const MULTIPLIER: i64 = 2;

    /// `var` multiplied by the class multiplier
    pub fn multiply(&self) -> schemaconf::Result<i64> {
        Ok(self.value::<i64>("var")? * Self::MULTIPLIER)
    }
}

settings! {
    /// Every built-in field type, all optional
    pub struct AllTypes {
        count: Integer::field().optional(),
        workers: PositiveInteger::field().optional(),
        name: Text::field().optional(),
        contact: Email::field().optional(),
        enabled: Boolean::field().optional(),
        ratio: Float::field().optional(),
        homepage: Url::field().optional(),
    }
}

settings! {
    /// Three ordered fields for pinning update order
    pub struct Sequential {
        first: Integer::field(),
        second: Integer::field(),
        third: Integer::field(),
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Install a test logger once; repeated calls are no-ops
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Temporary directory for file round trips
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        init_logger();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Path of a file inside the fixture directory
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read a settings file as a plain JSON tree
pub fn read_json_file(path: &std::path::Path) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Fresh instance of `C`
pub fn fresh<C: SettingsSchema>() -> C {
    init_logger();
    C::new()
}
