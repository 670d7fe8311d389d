//! Configuration types
//!
//! Value types used by the settings schema and their text forms.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

/// Flat key/value view of a configuration source (key -> raw text)
pub type Properties = BTreeMap<String, String>;

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Schema default
    Default,
    /// From a properties or JSON file
    File,
    /// From environment variable
    Environment,
    /// Changed at runtime through an administrative operation
    AdminApi,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Default => write!(f, "default"),
            ValueSource::File => write!(f, "file"),
            ValueSource::Environment => write!(f, "environment"),
            ValueSource::AdminApi => write!(f, "admin api"),
        }
    }
}

/// Which encoders may be opened for transcoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EncoderSelectionPreference {
    /// Try the GPU encoder first, fall back to the CPU encoder
    #[default]
    #[serde(rename = "gpu_and_cpu")]
    GpuAndCpu,
    /// Only the GPU encoder; fail if it cannot be opened
    #[serde(rename = "only_gpu")]
    OnlyGpu,
}

impl fmt::Display for EncoderSelectionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpuAndCpu => write!(f, "gpu_and_cpu"),
            Self::OnlyGpu => write!(f, "only_gpu"),
        }
    }
}

impl FromStr for EncoderSelectionPreference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().trim_matches('\'');
        match value.to_lowercase().as_str() {
            "gpu_and_cpu" => Ok(Self::GpuAndCpu),
            "only_gpu" => Ok(Self::OnlyGpu),
            _ => Err(ConfigError::InvalidValue(
                "encoder_selection_preference".to_string(),
                format!("Invalid encoder selection preference: {}. Valid values are: gpu_and_cpu, only_gpu", s),
            )),
        }
    }
}

/// A type that can be stored in a setting
///
/// `parse_setting` turns the raw text of a configuration source into the
/// value; `render_setting` gives the text back (`None` for an unset value).
pub trait SettingValue: Sized {
    /// Parse raw text
    fn parse_setting(raw: &str) -> Result<Self, String>;

    /// Render as raw text
    fn render_setting(&self) -> Option<String>;
}

impl SettingValue for bool {
    fn parse_setting(raw: &str) -> Result<Self, String> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            other => Err(format!("'{}' is not a boolean", other)),
        }
    }

    fn render_setting(&self) -> Option<String> {
        Some(self.to_string())
    }
}

macro_rules! integer_setting {
    ($($ty:ty),*) => {
        $(
            impl SettingValue for $ty {
                fn parse_setting(raw: &str) -> Result<Self, String> {
                    raw.trim()
                        .parse::<$ty>()
                        .map_err(|e| format!("'{}' is not a valid {}: {}", raw, stringify!($ty), e))
                }

                fn render_setting(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

integer_setting!(u16, u32);

impl SettingValue for String {
    fn parse_setting(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn render_setting(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl SettingValue for Option<String> {
    fn parse_setting(raw: &str) -> Result<Self, String> {
        Ok(Some(raw.to_string()))
    }

    fn render_setting(&self) -> Option<String> {
        self.clone()
    }
}

impl SettingValue for EncoderSelectionPreference {
    fn parse_setting(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|e: ConfigError| e.to_string())
    }

    fn render_setting(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Whether a setting type may stay unset when the schema gives no default
pub trait Nullable {
    /// Value used when no default exists, `None` if the type has none
    fn unset() -> Option<Self>
    where
        Self: Sized;
}

macro_rules! not_nullable {
    ($($ty:ty),*) => {
        $(
            impl Nullable for $ty {
                fn unset() -> Option<Self> {
                    None
                }
            }
        )*
    };
}

not_nullable!(bool, u16, u32, String, EncoderSelectionPreference);

impl Nullable for Option<String> {
    fn unset() -> Option<Self> {
        Some(None)
    }
}
