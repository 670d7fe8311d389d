//! Settings builder
//!
//! This module provides a builder pattern for constructing the settings store
//! from layered configuration sources.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};

use crate::config::defaults::ENV_PREFIX;
use crate::config::error::Result;
use crate::config::schema::{self, AppSettings};
use crate::config::source::{ConfigSource, DefaultSource, EnvSource, JsonFileSource, PropertiesSource};
use crate::config::types::{Properties, ValueSource};
use crate::config::validator::{check_warnings, validate_settings};
use crate::store::SettingsStore;

/// Settings builder
///
/// Sources are applied in the order they are added; a later source wins over
/// an earlier one for the same key.
pub struct SettingsBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
    validate: bool,
}

impl SettingsBuilder {
    /// Create a new builder with no sources
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            validate: true,
        }
    }

    /// Add default source
    pub fn with_defaults(self) -> Self {
        debug!("Adding default configuration source");
        self.with_source(Box::new(DefaultSource))
    }

    /// Add properties file source
    pub fn with_properties_file<P: AsRef<Path>>(self, path: P) -> Self {
        let path = path.as_ref();
        debug!("Adding properties file source: {}", path.display());
        self.with_source(Box::new(PropertiesSource::from_file(path)))
    }

    /// Add in-memory properties source
    pub fn with_properties(self, props: Properties) -> Self {
        self.with_source(Box::new(PropertiesSource::from_map(props)))
    }

    /// Add JSON file source
    pub fn with_json_file<P: AsRef<Path>>(self, path: P) -> Self {
        let path = path.as_ref();
        debug!("Adding JSON file source: {}", path.display());
        self.with_source(Box::new(JsonFileSource::new(path)))
    }

    /// Add environment source
    pub fn with_env(self, prefix: &str) -> Self {
        debug!("Adding environment configuration source with prefix: {}", prefix);
        self.with_source(Box::new(EnvSource::new(prefix)))
    }

    /// Add any source
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Disable validation
    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Merge the sources and resolve the schema
    ///
    /// Returns the settings and the origin of every key a source provided.
    pub fn resolve(&self) -> Result<(AppSettings, HashMap<String, ValueSource>)> {
        let mut merged = Properties::new();
        let mut origins = HashMap::new();

        debug!("Building settings from {} sources", self.sources.len());

        for source in &self.sources {
            let source_type = source.source_type();
            debug!("Loading configuration from source: {:?}", source_type);

            for (key, value) in source.load()? {
                if schema::spec(&key).is_none() {
                    warn!("Ignoring unknown setting '{}' from {} source", key, source_type);
                    continue;
                }
                origins.insert(key.clone(), source_type);
                merged.insert(key, value);
            }
        }

        let settings = AppSettings::resolve(&merged)?;
        Ok((settings, origins))
    }

    /// Build the settings store
    pub fn build(self) -> Result<SettingsStore> {
        let (settings, origins) = self.resolve()?;

        if self.validate {
            debug!("Validating settings");
            validate_settings(&settings)?;
        }

        for warning in check_warnings(&settings) {
            warn!("{}", warning);
        }

        let store = SettingsStore::with_sources(settings, origins)?;

        debug!("Final settings:");
        store.log();

        Ok(store)
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new().with_defaults().with_env(ENV_PREFIX)
    }
}
