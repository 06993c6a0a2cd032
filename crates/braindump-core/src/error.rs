//! Core error types for braindump-core.
//!
//! The keystroke and sampling paths never fail. Errors only come from the
//! settings file and from parsing replay scripts.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for braindump-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Replay script errors
    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not name a known setting
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Keystroke replay script errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// Line is not `<t_ms> <key>`
    #[error("line {line}: expected '<t_ms> <key>', got '{content}'")]
    Malformed { line: usize, content: String },

    /// Timestamp is not an unsigned integer
    #[error("line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp { line: usize, value: String },

    /// Timestamps must be non-decreasing
    #[error("line {line}: timestamp {at_ms} is earlier than previous {previous_ms}")]
    OutOfOrder {
        line: usize,
        at_ms: u64,
        previous_ms: u64,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
