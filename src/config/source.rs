//! Configuration sources
//!
//! This module defines the trait every configuration source implements and
//! the sources shipped with the crate. A source yields a flat map of setting
//! keys to raw text; the builder layers them and resolves the schema.

use std::env::{self, VarError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::defaults::{env_var_name, is_secret, ENV_PREFIX, MASK};
use crate::config::error::{ConfigError, Result};
use crate::config::schema::SCHEMA;
use crate::config::types::{Properties, ValueSource};

/// Configuration source trait
pub trait ConfigSource {
    /// Load the raw values this source provides
    fn load(&self) -> Result<Properties>;

    /// Get the source type
    fn source_type(&self) -> ValueSource;
}

/// Default configuration source
///
/// Provides no values; the schema defaults apply.
pub struct DefaultSource;

impl ConfigSource for DefaultSource {
    fn load(&self) -> Result<Properties> {
        debug!("Loading default configuration");
        Ok(Properties::new())
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::Default
    }
}

enum PropertiesInput {
    Map(Properties),
    File(PathBuf),
}

/// Properties configuration source
///
/// Either an in-memory map or a `.properties` file.
pub struct PropertiesSource {
    input: PropertiesInput,
}

impl PropertiesSource {
    /// Create a source from an in-memory map
    pub fn from_map(props: Properties) -> Self {
        Self {
            input: PropertiesInput::Map(props),
        }
    }

    /// Create a source reading a properties file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            input: PropertiesInput::File(path.as_ref().to_path_buf()),
        }
    }

    fn load_file(path: &Path) -> Result<Properties> {
        debug!("Loading properties from file: {}", path.display());

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Properties file not found: {}", path.display());
                warn!("Will use default values unless overridden by other sources");
                return Ok(Properties::new());
            }
            Err(e) => {
                warn!("Failed to read properties file {}: {}", path.display(), e);
                return Err(ConfigError::FileReadError(path.to_path_buf(), e.to_string()));
            }
        };

        Ok(parse_properties(&contents))
    }
}

impl ConfigSource for PropertiesSource {
    fn load(&self) -> Result<Properties> {
        match &self.input {
            PropertiesInput::Map(props) => {
                debug!("Loading {} properties from memory", props.len());
                Ok(props.clone())
            }
            PropertiesInput::File(path) => Self::load_file(path),
        }
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::File
    }
}

/// Parse the text of a properties file
///
/// Follows the `.properties` line format:
///
/// - lines whose first non-blank character is `#` or `!` are comments;
/// - a line ending in an odd number of `\` continues on the next line, whose
///   leading whitespace is dropped;
/// - the key ends at the first unescaped `=`, `:` or whitespace, and one
///   separator plus the whitespace around it is skipped;
/// - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded in keys and
///   values; any other escaped character stands for itself.
///
/// A line holding only a key sets it to the empty string. Trailing
/// whitespace of a value is kept.
pub fn parse_properties(contents: &str) -> Properties {
    let mut props = Properties::new();
    let mut lines = contents.lines();

    while let Some(line) = lines.next() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        if key.is_empty() {
            continue;
        }
        props.insert(unescape(key), unescape(value));
    }

    props
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start();
    let value = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest)
        .trim_start();

    (&line[..key_end], value)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

/// JSON file configuration source
///
/// The file holds one flat object keyed by the setting keys.
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl JsonFileSource {
    /// Create a new JSON file source
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigSource for JsonFileSource {
    fn load(&self) -> Result<Properties> {
        debug!("Loading configuration from JSON file: {}", self.path.display());

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(self.path.clone()));
            }
            Err(e) => {
                return Err(ConfigError::FileReadError(self.path.clone(), e.to_string()));
            }
        };

        let value: serde_json::Value = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("Error parsing {}: {}", self.path.display(), e)))?;

        let serde_json::Value::Object(object) = value else {
            return Err(ConfigError::ParseError(format!(
                "{} must contain a JSON object",
                self.path.display()
            )));
        };

        let mut props = Properties::new();
        for (key, value) in object {
            let raw = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(ConfigError::ParseError(format!(
                        "Nested value for '{}' in {} is not supported",
                        key,
                        self.path.display()
                    )));
                }
            };
            props.insert(key, raw);
        }

        Ok(props)
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::File
    }
}

/// Environment variable configuration source
pub struct EnvSource {
    pub prefix: String,
}

impl EnvSource {
    /// Create a new environment source
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new(ENV_PREFIX)
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<Properties> {
        debug!("Loading configuration from environment variables with prefix: {}", self.prefix);

        let mut props = Properties::new();
        for spec in SCHEMA {
            let name = env_var_name(&self.prefix, spec.key);
            match env::var(&name) {
                Ok(value) => {
                    let shown = if is_secret(spec.key) { MASK } else { value.as_str() };
                    debug!("Found environment variable {}={}", name, shown);
                    props.insert(spec.key.to_string(), value);
                }
                Err(VarError::NotUnicode(_)) => {
                    warn!("Ignoring environment variable {}: value is not valid UTF-8", name);
                }
                Err(VarError::NotPresent) => {}
            }
        }

        Ok(props)
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::Environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    #[test]
    fn test_parse_properties() {
        let text = "\
# comment
! also a comment

settings.hlsTime = 4
settings.webRTCFrameRate:25
tokenHashSecret=abc=def
settings.serverName
";
        let props = parse_properties(text);
        assert_eq!(props.len(), 4);
        assert_eq!(props[SETTINGS_HLS_TIME], "4");
        assert_eq!(props[SETTINGS_WEBRTC_FRAME_RATE], "25");
        assert_eq!(props[TOKEN_HASH_SECRET], "abc=def");
        assert_eq!(props[SETTINGS_SERVER_NAME], "");
    }

    #[test]
    fn test_parse_properties_line_format() {
        let text = concat!(
            "   # indented comment\n",
            "settings.hlsflags delete_segments\n",
            "settings.remoteAllowedCIDR = 127.0.0.1, \\\n",
            "        10.0.0.0/8\n",
            "settings.muxerFinishScript=/opt/scripts/on\\u0020finish.sh\n",
            "settings.listenerHookURL=http\\://hooks.example.org/\\tx\n",
            "settings.vodFolder=C:\\\\streams\\\\\n",
            "settings.serverName=media\n",
        );

        let props = parse_properties(text);
        assert_eq!(props[SETTINGS_HLS_FLAGS], "delete_segments");
        assert_eq!(props[SETTINGS_REMOTE_ALLOWED_CIDR], "127.0.0.1, 10.0.0.0/8");
        assert_eq!(props[SETTINGS_MUXER_FINISH_SCRIPT], "/opt/scripts/on finish.sh");
        assert_eq!(props[SETTINGS_LISTENER_HOOK_URL], "http://hooks.example.org/\tx");
        assert_eq!(props[SETTINGS_VOD_FOLDER], "C:\\streams\\");
        assert_eq!(props[SETTINGS_SERVER_NAME], "media");
        assert_eq!(props.len(), 6);
    }

    #[test]
    fn test_malformed_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        match JsonFileSource::new(&path).load() {
            Err(ConfigError::ParseError(message)) => {
                assert!(message.contains("broken.json"), "{}", message);
            }
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial]
    fn test_env_value_not_utf8_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let prefix = "MEDIA_SETTINGS_UTF8_TEST_";
        let bad = env_var_name(prefix, SETTINGS_SERVER_NAME);
        let good = env_var_name(prefix, SETTINGS_HLS_TIME);
        env::set_var(&bad, OsStr::from_bytes(&[0x66, 0x6f, 0xff]));
        env::set_var(&good, "3");

        let props = EnvSource::new(prefix).load().unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[SETTINGS_HLS_TIME], "3");

        env::remove_var(&bad);
        env::remove_var(&good);
    }

    #[test]
    fn test_missing_properties_file_is_empty() {
        let source = PropertiesSource::from_file("/nonexistent/red5.properties");
        assert_eq!(source.load().unwrap(), Properties::new());
        assert_eq!(source.source_type(), ValueSource::File);
    }

    #[test]
    fn test_properties_from_map() {
        let mut map = Properties::new();
        map.insert(SETTINGS_HLS_TIME.to_string(), "2".to_string());
        let source = PropertiesSource::from_map(map.clone());
        assert_eq!(source.load().unwrap(), map);
    }

    #[test]
    fn test_missing_json_file() {
        let source = JsonFileSource::new("/nonexistent/settings.json");
        assert!(matches!(source.load(), Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_default_source_is_empty() {
        assert!(DefaultSource.load().unwrap().is_empty());
        assert_eq!(DefaultSource.source_type(), ValueSource::Default);
    }
}
