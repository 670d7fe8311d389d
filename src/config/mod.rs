//! Configuration module
//!
//! This module declares the settings schema and handles loading settings from
//! different sources (properties files, JSON files, environment variables),
//! validating them and installing the process-wide store.

pub mod builder;
pub mod defaults;
pub mod error;
pub mod manager;
pub mod schema;
pub mod source;
pub mod types;
pub mod validator;

pub use self::builder::SettingsBuilder;
pub use self::defaults::{env_var_name, ENV_PREFIX};
pub use self::error::{ConfigError, Result};
pub use self::manager::{install, is_installed, settings};
pub use self::schema::{AppSettings, SettingSpec, SCHEMA};
pub use self::source::{ConfigSource, DefaultSource, EnvSource, JsonFileSource, PropertiesSource};
pub use self::types::{EncoderSelectionPreference, Properties, SettingValue, ValueSource};
pub use self::validator::{check_warnings, validate_settings, SettingsValidator};
