//! Core error types for keepsake-core.
//!
//! None of these are fatal to the engine: storage and catalog failures are
//! logged and degrade to "no record" or "empty catalog". They are still
//! typed so callers that want to surface them can.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for keepsake-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence slot errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Content catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a [`KeyValueSlot`](crate::storage::KeyValueSlot).
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading the slot failed
    #[error("Failed to read {location}: {source}")]
    ReadFailed {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the slot failed (disk full, permissions, quota)
    #[error("Failed to write {location}: {message}")]
    WriteFailed { location: String, message: String },

    /// Removing the slot failed
    #[error("Failed to remove {location}: {source}")]
    RemoveFailed {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// No record has been loaded or initialized yet
    #[error("No progress record is loaded")]
    NoRecord,
}

/// Errors raised while loading a content catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Local file could not be read
    #[error("Failed to read catalog at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote source could not be fetched
    #[error("Failed to fetch catalog from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote source answered with a non-success status
    #[error("Catalog request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Payload is not a valid catalog document
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two entries share an id
    #[error("Duplicate catalog id: {0}")]
    DuplicateId(String),

    /// An entry has an id the engine cannot address
    #[error("Invalid catalog id: {0}")]
    InvalidId(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to locate or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
