//! Common module
//!
//! Shared error type, result alias and logging setup.

pub mod error;
pub mod log;

// Re-export commonly used types and functions
pub use self::error::{Result, SettingsError};
pub use self::log::init_logger;
