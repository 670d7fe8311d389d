//! Settings store
//!
//! [`SettingsStore`] is the shared, process-wide owner of every setting. Plain
//! settings sit behind one read/write lock and follow last-write-wins. The
//! allow-list (specification plus matchers) and the encoder ladder (serialised
//! form plus decoded rungs) each have their own mutex so their two forms are
//! only ever read and written together.
//!
//! Typed getter/setter pairs for the plain settings are generated from the
//! schema in [`crate::config::schema`].

mod access;
mod ladder;

pub use self::access::AccessListSnapshot;

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};
use serde::Serialize;

use crate::access::NetMask;
use crate::config::defaults::{MASK, SETTINGS_ENCODER_SETTINGS_STRING, SETTINGS_REMOTE_ALLOWED_CIDR};
use crate::config::error::Result;
use crate::config::schema::{AppSettings, SCHEMA};
use crate::config::ValueSource;
use crate::encoder::{EncoderRung, MalformedEncoderSpec};

use self::access::AllowList;
use self::ladder::LadderCache;

/// One setting as shown to operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingEntry {
    /// Setting key
    pub key: &'static str,
    /// Text form, masked for secrets, `None` when unset
    pub value: Option<String>,
    /// Where the value came from
    pub source: ValueSource,
}

/// Shared runtime settings
#[derive(Debug)]
pub struct SettingsStore {
    /// Plain settings. `remote_allowed_cidr` and `encoder_settings_string`
    /// live in `allow_list` and `ladder` and are left empty here.
    values: RwLock<AppSettings>,
    /// Schema defaults, restored by `reset_defaults`
    defaults: AppSettings,
    allow_list: Mutex<AllowList>,
    ladder: Mutex<LadderCache>,
    sources: RwLock<HashMap<String, ValueSource>>,
}

impl SettingsStore {
    /// Create a store holding `values`
    ///
    /// Fails when the schema defaults themselves do not resolve.
    pub fn new(values: AppSettings) -> Result<Self> {
        Self::with_sources(values, HashMap::new())
    }

    /// Create a store with every setting at its default
    pub fn from_defaults() -> Result<Self> {
        Self::new(AppSettings::defaults()?)
    }

    /// Create a store and remember where each value came from
    pub fn with_sources(mut values: AppSettings, sources: HashMap<String, ValueSource>) -> Result<Self> {
        let defaults = AppSettings::defaults()?;
        let cidr = std::mem::take(&mut values.remote_allowed_cidr);
        let encoder_settings = values.encoder_settings_string.take();

        Ok(Self {
            values: RwLock::new(values),
            defaults,
            allow_list: Mutex::new(AllowList::new(cidr)),
            ladder: Mutex::new(LadderCache::new(encoder_settings)),
            sources: RwLock::new(sources),
        })
    }

    pub(crate) fn values(&self) -> RwLockReadGuard<'_, AppSettings> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn values_mut(&self) -> RwLockWriteGuard<'_, AppSettings> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn allow_list(&self) -> MutexGuard<'_, AllowList> {
        self.allow_list.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ladder(&self) -> MutexGuard<'_, LadderCache> {
        self.ladder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn mark_source(&self, key: &str, source: ValueSource) {
        self.sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), source);
    }

    /// Where the current value of `key` came from
    pub fn source(&self, key: &str) -> ValueSource {
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(ValueSource::Default)
    }

    // --- Allow-list ---

    /// Comma separated networks allowed to use the REST interface
    pub fn remote_allowed_cidr(&self) -> String {
        self.allow_list().raw().to_string()
    }

    /// Replace the allow-list specification
    ///
    /// The matchers are rebuilt before the lock is released. Rejected entries
    /// are logged and skipped.
    pub fn set_remote_allowed_cidr(&self, spec: impl Into<String>) {
        self.allow_list().set(spec.into());
        self.mark_source(SETTINGS_REMOTE_ALLOWED_CIDR, ValueSource::AdminApi);
    }

    /// Matchers for the current allow-list
    ///
    /// An empty list is rebuilt from the specification before returning.
    pub fn allowed_cidr_list(&self) -> Arc<[NetMask]> {
        self.allow_list().matchers()
    }

    /// Specification and matchers from the same write
    pub fn access_list(&self) -> AccessListSnapshot {
        self.allow_list().snapshot()
    }

    /// Check a client address against the allow-list
    pub fn is_remote_allowed(&self, ip: IpAddr) -> bool {
        crate::access::matches(&self.allowed_cidr_list(), ip)
    }

    // --- Encoder ladder ---

    /// Serialised adaptive bitrate ladder, `None` when not configured
    pub fn encoder_settings_string(&self) -> Option<String> {
        self.ladder().raw()
    }

    /// Replace the serialised ladder; the rungs are decoded on next read
    pub fn set_encoder_settings_string(&self, spec: Option<String>) {
        self.ladder().set_raw(spec);
        self.mark_source(SETTINGS_ENCODER_SETTINGS_STRING, ValueSource::AdminApi);
    }

    /// The adaptive bitrate ladder
    ///
    /// Returns the cached rungs, or decodes the serialised form when nothing is
    /// cached. `Ok(None)` means no ladder is configured.
    pub fn adaptive_resolution_list(&self) -> std::result::Result<Option<Arc<[EncoderRung]>>, MalformedEncoderSpec> {
        self.ladder().rungs()
    }

    /// Replace the ladder and its serialised form
    pub fn set_adaptive_resolution_list(&self, rungs: Option<Vec<EncoderRung>>) {
        self.ladder().set_rungs(rungs);
        self.mark_source(SETTINGS_ENCODER_SETTINGS_STRING, ValueSource::AdminApi);
    }

    // --- Whole store ---

    /// Restore the resettable settings to their defaults
    ///
    /// Only settings flagged for reset in the schema change; credentials,
    /// encoder options, WebRTC transport settings and the like keep their
    /// values. The decoded ladder is dropped and the allow-list is rebuilt
    /// from its default specification.
    pub fn reset_defaults(&self) {
        {
            let mut values = self.values_mut();
            values.reset_from(&self.defaults);
            values.remote_allowed_cidr.clear();
        }

        self.allow_list().set(self.defaults.remote_allowed_cidr.clone());
        self.ladder().clear_rungs();

        {
            let mut sources = self.sources.write().unwrap_or_else(PoisonError::into_inner);
            for spec in SCHEMA.iter().filter(|spec| spec.reset) {
                sources.insert(spec.key.to_string(), ValueSource::Default);
            }
        }

        info!("Settings reset to defaults");
    }

    /// Copy of every setting, including the allow-list and ladder strings
    pub fn snapshot(&self) -> AppSettings {
        let mut snapshot = self.values().clone();
        snapshot.remote_allowed_cidr = self.remote_allowed_cidr();
        snapshot.encoder_settings_string = self.encoder_settings_string();
        snapshot
    }

    /// Text form of `key`, `None` when unset
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        match key {
            SETTINGS_REMOTE_ALLOWED_CIDR => Ok(Some(self.remote_allowed_cidr())),
            SETTINGS_ENCODER_SETTINGS_STRING => Ok(self.encoder_settings_string()),
            _ => self.values().get_raw(key),
        }
    }

    /// Parse `raw` into `key`
    ///
    /// Nothing changes when the key is unknown or the value does not parse.
    pub fn set_raw(&self, key: &str, raw: &str) -> Result<()> {
        match key {
            SETTINGS_REMOTE_ALLOWED_CIDR => self.set_remote_allowed_cidr(raw),
            SETTINGS_ENCODER_SETTINGS_STRING => self.set_encoder_settings_string(Some(raw.to_string())),
            _ => {
                self.values_mut().set_raw(key, raw)?;
                self.mark_source(key, ValueSource::AdminApi);
            }
        }
        debug!("Setting {} updated", key);
        Ok(())
    }

    /// Every setting in schema order, secrets masked
    pub fn entries(&self) -> Vec<SettingEntry> {
        let snapshot = self.snapshot();
        SCHEMA
            .iter()
            .map(|spec| {
                let value = snapshot.get_raw(spec.key).ok().flatten();
                let value = match value {
                    Some(v) if spec.is_secret() && !v.is_empty() => Some(MASK.to_string()),
                    other => other,
                };
                SettingEntry {
                    key: spec.key,
                    value,
                    source: self.source(spec.key),
                }
            })
            .collect()
    }

    /// Log every setting with its origin
    pub fn log(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }

        debug!("=== Settings ===");
        for entry in self.entries() {
            debug!(
                "  {} = {} (from {})",
                entry.key,
                entry.value.as_deref().unwrap_or("<unset>"),
                entry.source
            );
        }
        debug!("================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::config::{ConfigError, EncoderSelectionPreference};

    #[test]
    fn test_plain_accessors() {
        let store = SettingsStore::from_defaults().unwrap();
        assert!(!store.mp4_muxing_enabled());
        store.set_mp4_muxing_enabled(true);
        assert!(store.mp4_muxing_enabled());
        assert_eq!(store.source(SETTINGS_MP4_MUXING_ENABLED), ValueSource::AdminApi);
        assert_eq!(store.source(SETTINGS_HLS_TIME), ValueSource::Default);
    }

    #[test]
    fn test_guarded_fields_are_held_outside_values() {
        let store = SettingsStore::from_defaults().unwrap();
        assert!(store.values().remote_allowed_cidr.is_empty());
        assert_eq!(store.remote_allowed_cidr(), "127.0.0.1");
        assert_eq!(store.snapshot().remote_allowed_cidr, "127.0.0.1");
    }

    #[test]
    fn test_allow_list() {
        let store = SettingsStore::from_defaults().unwrap();
        assert!(store.is_remote_allowed("127.0.0.1".parse().unwrap()));
        assert!(!store.is_remote_allowed("10.0.0.1".parse().unwrap()));

        store.set_remote_allowed_cidr("10.0.0.0/8, junk");
        let snapshot = store.access_list();
        assert_eq!(snapshot.raw, "10.0.0.0/8, junk");
        assert_eq!(snapshot.matchers.len(), 1);
        assert!(store.is_remote_allowed("10.0.0.1".parse().unwrap()));
    }

    // Known edge case: a list whose entries are all rejected yields no
    // matchers, so every read parses the specification again and still
    // finds nothing. It behaves like an empty allow-list.
    #[test]
    fn test_all_invalid_allow_list_rebuilds_to_empty() {
        let store = SettingsStore::from_defaults().unwrap();
        store.set_remote_allowed_cidr("bogus, nope");

        for _ in 0..3 {
            assert!(store.allowed_cidr_list().is_empty());
            assert!(!store.is_remote_allowed("127.0.0.1".parse().unwrap()));
        }

        let snapshot = store.access_list();
        assert_eq!(snapshot.raw, "bogus, nope");
        assert!(snapshot.matchers.is_empty());
        assert_eq!(store.remote_allowed_cidr(), "bogus, nope");

        store.set_remote_allowed_cidr("127.0.0.1");
        assert_eq!(store.allowed_cidr_list().len(), 1);
    }

    #[test]
    fn test_ladder_round_trip_through_store() {
        let store = SettingsStore::from_defaults().unwrap();
        assert_eq!(store.adaptive_resolution_list().unwrap(), None);

        store.set_adaptive_resolution_list(Some(vec![EncoderRung::new(480, 800_000, 128_000)]));
        assert_eq!(store.encoder_settings_string().as_deref(), Some("480,800000,128000"));

        store.set_encoder_settings_string(Some("720,2000000,128000".to_string()));
        let rungs = store.adaptive_resolution_list().unwrap().unwrap();
        assert_eq!(&*rungs, &[EncoderRung::new(720, 2_000_000, 128_000)]);
    }

    #[test]
    fn test_malformed_ladder_is_reported() {
        let store = SettingsStore::from_defaults().unwrap();
        store.set_encoder_settings_string(Some("480,abc,128000".to_string()));
        assert!(store.adaptive_resolution_list().is_err());
    }

    #[test]
    fn test_raw_access() {
        let store = SettingsStore::from_defaults().unwrap();
        store.set_raw(SETTINGS_WEBRTC_FRAME_RATE, "25").unwrap();
        assert_eq!(store.web_rtc_frame_rate(), 25);
        assert_eq!(store.get_raw(SETTINGS_WEBRTC_FRAME_RATE).unwrap().as_deref(), Some("25"));

        store.set_raw(SETTINGS_REMOTE_ALLOWED_CIDR, "0.0.0.0/0").unwrap();
        assert_eq!(store.get_raw(SETTINGS_REMOTE_ALLOWED_CIDR).unwrap().as_deref(), Some("0.0.0.0/0"));

        assert!(matches!(
            store.set_raw(SETTINGS_WEBRTC_FRAME_RATE, "x"),
            Err(ConfigError::InvalidValue(_, _))
        ));
        assert_eq!(store.web_rtc_frame_rate(), 25);
        assert!(matches!(store.get_raw("nope"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_reset_defaults() {
        let store = SettingsStore::from_defaults().unwrap();
        store.set_hls_muxing_enabled(false);
        store.set_token_hash_secret("s3cret".to_string());
        store.set_hls_list_size(Some("10".to_string()));
        store.set_remote_allowed_cidr("10.0.0.0/8");
        store.set_encoder_selection_preference(EncoderSelectionPreference::OnlyGpu);
        store.set_encoder_name(Some("h264_nvenc".to_string()));
        store.set_adaptive_resolution_list(Some(vec![EncoderRung::new(240, 300_000, 64_000)]));

        store.reset_defaults();

        assert!(store.hls_muxing_enabled());
        assert_eq!(store.token_hash_secret(), "");
        assert_eq!(store.hls_list_size(), None);
        assert_eq!(store.remote_allowed_cidr(), "127.0.0.1");
        assert_eq!(store.allowed_cidr_list().len(), 1);
        assert_eq!(store.encoder_selection_preference(), EncoderSelectionPreference::OnlyGpu);
        assert_eq!(store.encoder_name().as_deref(), Some("h264_nvenc"));
        assert_eq!(store.source(SETTINGS_HLS_MUXING_ENABLED), ValueSource::Default);
        assert_eq!(store.source(SETTINGS_ENCODING_ENCODER_NAME), ValueSource::AdminApi);

        // Only the decoded ladder is dropped; the serialised form still decodes.
        assert_eq!(store.encoder_settings_string().as_deref(), Some("240,300000,64000"));
        assert_eq!(store.adaptive_resolution_list().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_entries_mask_secrets() {
        let store = SettingsStore::from_defaults().unwrap();
        store.set_token_hash_secret("s3cret".to_string());

        let entries = store.entries();
        assert_eq!(entries.len(), SCHEMA.len());
        let secret = entries.iter().find(|e| e.key == TOKEN_HASH_SECRET).unwrap();
        assert_eq!(secret.value.as_deref(), Some(MASK));
        let hls_time = entries.iter().find(|e| e.key == SETTINGS_HLS_TIME).unwrap();
        assert_eq!(hls_time.value, None);
    }
}
