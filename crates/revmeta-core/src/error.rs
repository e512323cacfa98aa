//! Error types for revmeta-core

use std::path::PathBuf;

/// Result type for revmeta-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mirroring metadata.
///
/// Guarded no-op paths (wrong item kind, nothing registered, foreign
/// field id) are reported through outcomes, never as errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file exists but could not be parsed
    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// Error reported by the host metadata store
    #[error(transparent)]
    Store(#[from] revmeta_store::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
