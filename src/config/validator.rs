//! Configuration validator
//!
//! This module provides functionality for validating resolved settings.

use crate::access;
use crate::config::defaults::{SETTINGS_PREVIEW_HEIGHT, SETTINGS_WEBRTC_FRAME_RATE};
use crate::config::error::{ConfigError, Result};
use crate::config::schema::AppSettings;
use crate::encoder;

/// Validate the settings
///
/// Fails on the first value the server cannot run with.
pub fn validate_settings(settings: &AppSettings) -> Result<()> {
    validate_media_settings(settings)?;
    validate_webrtc_settings(settings)?;
    Ok(())
}

fn validate_media_settings(settings: &AppSettings) -> Result<()> {
    if settings.preview_height == 0 {
        return Err(ConfigError::InvalidValue(
            SETTINGS_PREVIEW_HEIGHT.to_string(),
            "Preview height must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_webrtc_settings(settings: &AppSettings) -> Result<()> {
    if settings.web_rtc_frame_rate == 0 {
        return Err(ConfigError::InvalidValue(
            SETTINGS_WEBRTC_FRAME_RATE.to_string(),
            "Frame rate must be greater than 0".to_string(),
        ));
    }

    let (min, max) = (settings.web_rtc_port_range_min, settings.web_rtc_port_range_max);
    if min != 0 && max != 0 && min > max {
        return Err(ConfigError::InvalidCombination(format!(
            "WebRTC port range minimum {} exceeds maximum {}",
            min, max
        )));
    }

    Ok(())
}

/// Settings validator trait
pub trait SettingsValidator {
    /// Check settings for warnings
    fn check_warnings(&self) -> Vec<String>;
}

impl SettingsValidator for AppSettings {
    fn check_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.remote_allowed_cidr.trim().is_empty() {
            warnings.push("Remote allow-list is empty, no remote address will be allowed".to_string());
        } else {
            for diagnostic in access::parse(&self.remote_allowed_cidr).diagnostics {
                warnings.push(format!("Invalid allow-list entry {}", diagnostic));
            }
        }

        if (self.hash_control_publish_enabled || self.hash_control_play_enabled) && self.token_hash_secret.is_empty() {
            warnings.push("Hash control is enabled but tokenHashSecret is empty".to_string());
        }

        if let Some(spec) = &self.encoder_settings_string {
            if let Err(e) = encoder::decode(spec) {
                warnings.push(format!("Encoder settings cannot be decoded: {}", e));
            }
        }

        warnings
    }
}

/// Check settings for warnings (standalone function)
pub fn check_warnings(settings: &AppSettings) -> Vec<String> {
    SettingsValidator::check_warnings(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> AppSettings {
        AppSettings::defaults().unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_settings(&defaults()).is_ok());
        assert!(check_warnings(&defaults()).is_empty());
    }

    #[test]
    fn test_zero_frame_rate() {
        let mut settings = defaults();
        settings.web_rtc_frame_rate = 0;
        assert!(matches!(validate_settings(&settings), Err(ConfigError::InvalidValue(_, _))));
    }

    #[test]
    fn test_zero_preview_height() {
        let mut settings = defaults();
        settings.preview_height = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_port_range() {
        let mut settings = defaults();
        settings.web_rtc_port_range_min = 6000;
        assert!(validate_settings(&settings).is_ok());

        settings.web_rtc_port_range_max = 5000;
        assert!(matches!(validate_settings(&settings), Err(ConfigError::InvalidCombination(_))));

        settings.web_rtc_port_range_max = 7000;
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_warnings() {
        let mut settings = defaults();
        settings.remote_allowed_cidr = "10.0.0.0/8, nope".to_string();
        settings.hash_control_play_enabled = true;
        settings.encoder_settings_string = Some("720,x,128000".to_string());

        let warnings = check_warnings(&settings);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("nope"));

        settings.remote_allowed_cidr = String::new();
        assert!(check_warnings(&settings)[0].contains("empty"));
    }
}
