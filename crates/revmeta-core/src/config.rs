//! Mirror configuration
//!
//! The only knob is the debug flag, which gates the per-key diagnostic
//! log lines written during capture and restore. It is read from a TOML
//! file and may be overridden by the `REVMETA_DEBUG` environment variable:
//!
//! ```toml
//! debug = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding [`MirrorConfig::debug`]
pub const DEBUG_ENV: &str = "REVMETA_DEBUG";

/// Process-wide mirror settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Log every per-key copy and restore
    #[serde(default)]
    pub debug: bool,
}

impl MirrorConfig {
    pub fn debug() -> Self {
        Self { debug: true }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(Error::ConfigNotFound { .. }) => {
                tracing::debug!(?path, "No mirror config found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Apply the `REVMETA_DEBUG` override, if set
    pub fn with_env_override(self) -> Self {
        self.with_debug_override(std::env::var(DEBUG_ENV).ok().as_deref())
    }

    /// Apply a raw debug override value.
    ///
    /// Unrecognised values leave the setting unchanged.
    pub fn with_debug_override(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            match parse_flag(raw) {
                Some(debug) => self.debug = debug,
                None => tracing::warn!(value = raw, "Ignoring unrecognised {} value", DEBUG_ENV),
            }
        }
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
