//! Error handling module
//!
//! This module defines the crate-wide error type and result alias.

use thiserror::Error;

use crate::access::NetMaskError;
use crate::config::ConfigError;
use crate::encoder::MalformedEncoderSpec;

/// Settings store error type
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Encoder ladder could not be decoded
    #[error("Encoder settings error: {0}")]
    EncoderSpec(#[from] MalformedEncoderSpec),

    /// Network mask could not be parsed
    #[error("Network mask error: {0}")]
    NetMask(#[from] NetMaskError),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `SettingsError`.
pub type Result<T> = std::result::Result<T, SettingsError>;
