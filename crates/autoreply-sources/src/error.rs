//! Error types for autoreply-sources

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON rulebook: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML rulebook: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to write TOML rulebook: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Unsupported rulebook format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),
}
