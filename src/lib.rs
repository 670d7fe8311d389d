//! Media App Settings: runtime settings store for a streaming media server
//!
//! This library holds the per-application settings of a media server and the
//! two small codecs that sit next to them: the adaptive bitrate ladder and the
//! remote access allow-list.
//!
//! # Main Features
//!
//! - A statically declared settings schema with compile-time known defaults
//! - Layered configuration sources (properties, JSON, environment)
//! - A shared store whose allow-list and encoder ladder stay consistent under concurrent access
//! - Partial reset of the settings an operator may safely restore
//!
//! # Example
//!
//! ```no_run
//! use media_app_settings::config::{self, SettingsBuilder, ENV_PREFIX};
//! use media_app_settings::Result;
//!
//! fn main() -> Result<()> {
//!     let store = SettingsBuilder::new()
//!         .with_defaults()
//!         .with_properties_file("conf/red5.properties")
//!         .with_env(ENV_PREFIX)
//!         .build()?;
//!
//!     let settings = config::install(store)?;
//!     if settings.is_remote_allowed("127.0.0.1".parse().unwrap()) {
//!         println!("loopback may use the REST interface");
//!     }
//!
//!     Ok(())
//! }
//! ```

// Public modules
pub mod access;
pub mod common;
pub mod config;
pub mod encoder;
pub mod stats;
pub mod store;

// Re-export commonly used structures and functions for convenience
pub use access::{NetMask, ParsedAccessList};
pub use common::{init_logger, Result, SettingsError};
pub use config::{AppSettings, EncoderSelectionPreference, SettingsBuilder};
pub use encoder::EncoderRung;
pub use stats::StreamStats;
pub use store::{AccessListSnapshot, SettingEntry, SettingsStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
