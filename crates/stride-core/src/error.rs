//! Core error types for stride-core.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stride-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A phase index outside the routine. Well-behaved callers never
    /// trigger this; it guards against silently corrupting the sequence.
    #[error("phase index {index} out of range (routine has {len} phases)")]
    OutOfRange { index: usize, len: usize },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The driver task ended abnormally
    #[error("Driver error: {0}")]
    Driver(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
