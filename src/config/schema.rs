//! Settings schema
//!
//! Every setting is declared once below with its key, field, type, raw default
//! and whether `reset_defaults` restores it. The declaration generates:
//!
//! - [`AppSettings`], the plain value bag,
//! - [`SCHEMA`], the table consulted when settings are resolved,
//! - key based raw access (`get_raw` / `set_raw`),
//! - the typed getter/setter pairs on [`SettingsStore`].
//!
//! Settings marked `guarded` keep their value behind the store's own locks and
//! get hand written accessors there.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::defaults::{self, *};
use crate::config::error::{ConfigError, Result};
use crate::config::types::{EncoderSelectionPreference, Nullable, Properties, SettingValue, ValueSource};
use crate::store::SettingsStore;

/// Static description of one setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingSpec {
    /// Flat key, unique process-wide
    pub key: &'static str,
    /// Field name in [`AppSettings`]
    pub field: &'static str,
    /// Raw default, `None` for settings that start unset
    pub default: Option<&'static str>,
    /// Restored by `reset_defaults`
    pub reset: bool,
}

impl SettingSpec {
    /// Whether the value must be masked in logs
    pub fn is_secret(&self) -> bool {
        defaults::is_secret(self.key)
    }
}

/// Look up the schema entry for `key`
pub fn spec(key: &str) -> Option<&'static SettingSpec> {
    SCHEMA.iter().find(|spec| spec.key == key)
}

fn parse_field<T: SettingValue>(key: &str, raw: &str) -> Result<T> {
    T::parse_setting(raw).map_err(|reason| ConfigError::InvalidValue(key.to_string(), reason))
}

fn resolve_field<T: SettingValue + Nullable>(
    key: &str,
    default: Option<&str>,
    props: &Properties,
) -> Result<T> {
    if let Some(raw) = props.get(key) {
        return parse_field(key, raw);
    }

    match default {
        Some(raw) => parse_field(key, raw),
        None => T::unset().ok_or_else(|| ConfigError::MissingDefault(key.to_string())),
    }
}

macro_rules! settings_schema {
    (@accessor guarded $key:expr; $(#[$doc:meta])* $field:ident, $setter:ident: $ty:ty) => {};

    (@accessor plain $key:expr; $(#[$doc:meta])* $field:ident, $setter:ident: $ty:ty) => {
        $(#[$doc])*
        pub fn $field(&self) -> $ty {
            self.values().$field.clone()
        }

        #[doc = concat!("Set `", stringify!($field), "`")]
        pub fn $setter(&self, value: $ty) {
            self.values_mut().$field = value;
            self.mark_source($key, ValueSource::AdminApi);
        }
    };

    ($(
        $(#[$doc:meta])*
        $field:ident, $setter:ident: $ty:ty = $key:expr, default = $default:expr, reset = $reset:expr, $access:ident;
    )*) => {
        /// All settings as plain values
        ///
        /// Serialises as a flat map keyed by the setting keys.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct AppSettings {
            $(
                $(#[$doc])*
                pub $field: $ty,
            )*
        }

        /// The settings schema, in declaration order
        pub static SCHEMA: &[SettingSpec] = &[
            $(
                SettingSpec {
                    key: $key,
                    field: stringify!($field),
                    default: $default,
                    reset: $reset,
                },
            )*
        ];

        impl AppSettings {
            /// Resolve every setting from `props`, falling back to schema defaults
            ///
            /// Fails on the first value that does not parse, or on a
            /// non-nullable setting without a default.
            pub fn resolve(props: &Properties) -> Result<Self> {
                Ok(Self {
                    $( $field: resolve_field::<$ty>($key, $default, props)?, )*
                })
            }

            /// Current value of `key` in text form, `None` when unset
            pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
                match key {
                    $( k if k == $key => Ok(self.$field.render_setting()), )*
                    _ => Err(ConfigError::UnknownKey(key.to_string())),
                }
            }

            /// Parse `raw` and store it in `key`
            ///
            /// Leaves the value untouched when parsing fails.
            pub fn set_raw(&mut self, key: &str, raw: &str) -> Result<()> {
                match key {
                    $(
                        k if k == $key => {
                            self.$field = parse_field::<$ty>($key, raw)?;
                            Ok(())
                        }
                    )*
                    _ => Err(ConfigError::UnknownKey(key.to_string())),
                }
            }

            /// Copy every resettable setting from `defaults`
            pub fn reset_from(&mut self, defaults: &AppSettings) {
                $(
                    if $reset {
                        self.$field = defaults.$field.clone();
                    }
                )*
            }
        }

        impl Serialize for AppSettings {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut map = serializer.serialize_map(Some(SCHEMA.len()))?;
                $( map.serialize_entry($key, &self.$field)?; )*
                map.end()
            }
        }

        impl SettingsStore {
            $(
                settings_schema!(@accessor $access $key; $(#[$doc])* $field, $setter: $ty);
            )*
        }
    };
}

settings_schema! {
    /// Record streams to MP4
    mp4_muxing_enabled, set_mp4_muxing_enabled: bool
        = SETTINGS_MP4_MUXING_ENABLED, default = Some("false"), reset = true, plain;

    /// Append the date and time to MP4 file names
    add_date_time_to_mp4_file_name, set_add_date_time_to_mp4_file_name: bool
        = SETTINGS_ADD_DATE_TIME_TO_MP4_FILE_NAME, default = Some("false"), reset = true, plain;

    /// Produce HLS output
    hls_muxing_enabled, set_hls_muxing_enabled: bool
        = SETTINGS_HLS_MUXING_ENABLED, default = Some("true"), reset = true, plain;

    /// Serialised adaptive bitrate ladder
    encoder_settings_string, set_encoder_settings_string: Option<String>
        = SETTINGS_ENCODER_SETTINGS_STRING, default = None, reset = false, guarded;

    /// HLS playlist size override
    hls_list_size, set_hls_list_size: Option<String>
        = SETTINGS_HLS_LIST_SIZE, default = None, reset = true, plain;

    /// HLS segment duration override
    hls_time, set_hls_time: Option<String>
        = SETTINGS_HLS_TIME, default = None, reset = true, plain;

    /// HLS playlist type, `event` or `vod`
    hls_play_list_type, set_hls_play_list_type: Option<String>
        = SETTINGS_HLS_PLAY_LIST_TYPE, default = None, reset = true, plain;

    /// Flags passed to the HLS muxer
    hls_flags, set_hls_flags: Option<String>
        = SETTINGS_HLS_FLAGS, default = None, reset = false, plain;

    /// Directory holding the MySQL client binaries
    my_sql_client_path, set_my_sql_client_path: String
        = SETTINGS_MY_SQL_CLIENT_PATH, default = Some(MY_SQL_CLIENT_PATH_STR), reset = false, plain;

    /// Accept WebRTC publishing and playback
    web_rtc_enabled, set_web_rtc_enabled: bool
        = SETTINGS_WEBRTC_ENABLED, default = Some("false"), reset = true, plain;

    /// Offer the original stream next to the adaptive renditions over WebRTC
    use_original_web_rtc_enabled, set_use_original_web_rtc_enabled: bool
        = SETTINGS_USE_ORIGINAL_WEBRTC_ENABLED, default = Some("true"), reset = false, plain;

    /// Delete playlists and segments when a broadcast ends
    delete_hls_files_on_ended, set_delete_hls_files_on_ended: bool
        = SETTINGS_DELETE_HLS_FILES_ON_ENDED, default = Some("true"), reset = true, plain;

    /// URL notified on stream events
    listener_hook_url, set_listener_hook_url: String
        = SETTINGS_LISTENER_HOOK_URL, default = Some(""), reset = false, plain;

    /// Reject publishers whose stream is not registered in the data store
    accept_only_streams_in_data_store, set_accept_only_streams_in_data_store: bool
        = SETTINGS_ACCEPT_ONLY_STREAMS_IN_DATA_STORE, default = Some("false"), reset = true, plain;

    /// One-time token control for publishing and playback
    token_control_enabled, set_token_control_enabled: bool
        = SETTINGS_TOKEN_CONTROL_ENABLED, default = Some("false"), reset = true, plain;

    /// Fully qualified server name
    server_name, set_server_name: Option<String>
        = SETTINGS_SERVER_NAME, default = None, reset = false, plain;

    facebook_client_id, set_facebook_client_id: Option<String>
        = FACEBOOK_CLIENT_ID, default = None, reset = false, plain;

    facebook_client_secret, set_facebook_client_secret: Option<String>
        = FACEBOOK_CLIENT_SECRET, default = None, reset = false, plain;

    periscope_client_id, set_periscope_client_id: Option<String>
        = PERISCOPE_CLIENT_ID, default = None, reset = false, plain;

    periscope_client_secret, set_periscope_client_secret: Option<String>
        = PERISCOPE_CLIENT_SECRET, default = None, reset = false, plain;

    youtube_client_id, set_youtube_client_id: Option<String>
        = YOUTUBE_CLIENT_ID, default = None, reset = false, plain;

    youtube_client_secret, set_youtube_client_secret: Option<String>
        = YOUTUBE_CLIENT_SECRET, default = None, reset = false, plain;

    /// Folder scanned for uploaded VoD files
    vod_folder, set_vod_folder: Option<String>
        = SETTINGS_VOD_FOLDER, default = None, reset = false, plain;

    /// Overwrite existing preview images
    preview_overwrite, set_preview_overwrite: bool
        = SETTINGS_PREVIEW_OVERWRITE, default = Some("false"), reset = true, plain;

    stalker_db_server, set_stalker_db_server: Option<String>
        = SETTINGS_STALKER_DB_SERVER, default = None, reset = false, plain;

    stalker_db_username, set_stalker_db_username: Option<String>
        = SETTINGS_STALKER_DB_USER_NAME, default = None, reset = false, plain;

    stalker_db_password, set_stalker_db_password: Option<String>
        = SETTINGS_STALKER_DB_PASSWORD, default = None, reset = false, plain;

    /// Run object detection on incoming streams
    object_detection_enabled, set_object_detection_enabled: bool
        = SETTINGS_OBJECT_DETECTION_ENABLED, default = Some("false"), reset = true, plain;

    /// Preview capture period in milliseconds
    create_preview_period, set_create_preview_period: u32
        = SETTINGS_CREATE_PREVIEW_PERIOD, default = Some(CREATE_PREVIEW_PERIOD_STR), reset = true, plain;

    /// Stream fetcher restart period in seconds, 0 disables restarts
    restart_stream_fetcher_period, set_restart_stream_fetcher_period: u32
        = SETTINGS_STREAM_FETCHER_RESTART_PERIOD, default = Some("0"), reset = true, plain;

    /// Stream fetcher buffer time in milliseconds
    stream_fetcher_buffer_time, set_stream_fetcher_buffer_time: u32
        = SETTINGS_STREAM_FETCHER_BUFFER_TIME, default = Some("0"), reset = false, plain;

    /// Script run when muxing finishes
    muxer_finish_script, set_muxer_finish_script: String
        = SETTINGS_MUXER_FINISH_SCRIPT, default = Some(""), reset = false, plain;

    /// WebRTC encoder frame rate
    web_rtc_frame_rate, set_web_rtc_frame_rate: u32
        = SETTINGS_WEBRTC_FRAME_RATE, default = Some(WEBRTC_FRAME_RATE_STR), reset = true, plain;

    /// Collect likes and comments from social media channels
    collect_social_media_activity, set_collect_social_media_activity: bool
        = SETTINGS_COLLECT_SOCIAL_MEDIA_ACTIVITY, default = Some("false"), reset = false, plain;

    /// Require a hash token for publishing
    hash_control_publish_enabled, set_hash_control_publish_enabled: bool
        = SETTINGS_HASH_CONTROL_PUBLISH_ENABLED, default = Some("false"), reset = true, plain;

    /// Require a hash token for playback
    hash_control_play_enabled, set_hash_control_play_enabled: bool
        = SETTINGS_HASH_CONTROL_PLAY_ENABLED, default = Some("false"), reset = true, plain;

    /// Shared secret for hash based tokens
    token_hash_secret, set_token_hash_secret: String
        = TOKEN_HASH_SECRET, default = Some(""), reset = true, plain;

    /// Lowest UDP port used by WebRTC, 0 for any
    web_rtc_port_range_min, set_web_rtc_port_range_min: u16
        = SETTINGS_WEBRTC_PORT_RANGE_MIN, default = Some("0"), reset = false, plain;

    /// Highest UDP port used by WebRTC, 0 for any
    web_rtc_port_range_max, set_web_rtc_port_range_max: u16
        = SETTINGS_WEBRTC_PORT_RANGE_MAX, default = Some("0"), reset = false, plain;

    stun_server_uri, set_stun_server_uri: String
        = SETTINGS_WEBRTC_STUN_SERVER_URI, default = Some(STUN_SERVER_URI_STR), reset = false, plain;

    /// Gather TCP ICE candidates
    web_rtc_tcp_candidates_enabled, set_web_rtc_tcp_candidates_enabled: bool
        = SETTINGS_WEBRTC_TCP_CANDIDATE_ENABLED, default = Some("true"), reset = false, plain;

    encoder_name, set_encoder_name: Option<String>
        = SETTINGS_ENCODING_ENCODER_NAME, default = None, reset = false, plain;

    encoder_preset, set_encoder_preset: Option<String>
        = SETTINGS_ENCODING_PRESET, default = None, reset = false, plain;

    encoder_profile, set_encoder_profile: Option<String>
        = SETTINGS_ENCODING_PROFILE, default = None, reset = false, plain;

    encoder_level, set_encoder_level: Option<String>
        = SETTINGS_ENCODING_LEVEL, default = None, reset = false, plain;

    /// Encoder rate control mode
    encoder_rc, set_encoder_rc: Option<String>
        = SETTINGS_ENCODING_RC, default = None, reset = false, plain;

    /// Extra encoder specific options
    encoder_specific, set_encoder_specific: Option<String>
        = SETTINGS_ENCODING_SPECIFIC, default = None, reset = false, plain;

    /// Preview image height in pixels
    preview_height, set_preview_height: u32
        = SETTINGS_PREVIEW_HEIGHT, default = Some(PREVIEW_HEIGHT_STR), reset = false, plain;

    /// Comma separated networks allowed to use the REST interface
    remote_allowed_cidr, set_remote_allowed_cidr: String
        = SETTINGS_REMOTE_ALLOWED_CIDR, default = Some(REMOTE_ALLOWED_CIDR_STR), reset = true, guarded;

    /// Persist stream statistics to the data store
    write_stats_to_datastore, set_write_stats_to_datastore: bool
        = SETTINGS_WRITE_STATS_TO_DATASTORE, default = Some("true"), reset = false, plain;

    encoder_selection_preference, set_encoder_selection_preference: EncoderSelectionPreference
        = SETTINGS_ENCODER_SELECTION_PREFERENCE, default = Some(ENCODER_SELECTION_PREFERENCE_STR), reset = false, plain;
}

impl AppSettings {
    /// Settings with every schema default applied
    pub fn defaults() -> Result<Self> {
        Self::resolve(&Properties::new())
    }
}
