//! Temporary mirror configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// File name the fixtures write configuration to
pub const CONFIG_FILE: &str = "revmeta.toml";

/// A temporary directory holding a `revmeta.toml`.
///
/// The directory is removed when the value is dropped.
pub struct TestConfig {
    temp_dir: TempDir,
}

impl TestConfig {
    /// Write a configuration with the given debug flag.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn with_debug(debug: bool) -> Self {
        Self::with_content(&format!("debug = {}\n", debug))
    }

    /// Write arbitrary configuration text.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn with_content(content: &str) -> Self {
        let temp_dir = TempDir::new()
            .unwrap_or_else(|e| panic!("TestConfig: failed to create temp dir: {e}"));
        fs::write(temp_dir.path().join(CONFIG_FILE), content)
            .unwrap_or_else(|e| panic!("TestConfig: failed to write {CONFIG_FILE}: {e}"));
        Self { temp_dir }
    }

    /// Directory containing the configuration file
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Full path of the configuration file
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join(CONFIG_FILE)
    }
}
