//! Process-wide settings
//!
//! The server holds exactly one settings store. It is installed once at
//! startup and shared by every component afterwards.

use std::sync::Arc;

use log::info;
use once_cell::sync::OnceCell;

use crate::config::error::{ConfigError, Result};
use crate::store::SettingsStore;

static SETTINGS: OnceCell<Arc<SettingsStore>> = OnceCell::new();

/// Install the process-wide settings store
///
/// Fails with [`ConfigError::AlreadyInitialized`] when a store is already installed.
pub fn install(store: SettingsStore) -> Result<Arc<SettingsStore>> {
    let store = Arc::new(store);
    SETTINGS
        .set(Arc::clone(&store))
        .map_err(|_| ConfigError::AlreadyInitialized)?;

    info!("Settings installed");
    Ok(store)
}

/// The process-wide settings store
pub fn settings() -> Result<Arc<SettingsStore>> {
    SETTINGS.get().cloned().ok_or(ConfigError::NotInitialized)
}

/// Whether a settings store has been installed
pub fn is_installed() -> bool {
    SETTINGS.get().is_some()
}
