//! Configuration errors
//!
//! This module defines error types for the configuration module.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Error reading file
    #[error("Error reading configuration file {}: {}", .0.display(), .1)]
    FileReadError(PathBuf, String),

    /// Error parsing configuration
    #[error("Error parsing configuration: {0}")]
    ParseError(String),

    /// Invalid value for a setting
    #[error("Invalid value for '{0}': {1}")]
    InvalidValue(String, String),

    /// A non-nullable setting has no default in the schema
    #[error("Setting '{0}' has no default value")]
    MissingDefault(String),

    /// Key is not part of the schema
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    /// Invalid combination of settings
    #[error("Invalid combination of settings: {0}")]
    InvalidCombination(String),

    /// Settings were installed twice
    #[error("Settings have already been initialized")]
    AlreadyInitialized,

    /// Settings were read before being installed
    #[error("Settings have not been initialized")]
    NotInitialized,
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
