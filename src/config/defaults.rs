//! Setting keys and default values
//!
//! Single source of truth for the flat keys and the raw default literals the
//! schema is built from.

/// Environment variable prefix for all settings
pub const ENV_PREFIX: &str = "MEDIA_SETTINGS_";

/// Namespace shared by most keys, dropped when deriving environment names
pub const KEY_NAMESPACE: &str = "settings.";

/// Replacement shown for secret values in logs and reports
pub const MASK: &str = "******";

// --- Keys ---

pub const SETTINGS_MP4_MUXING_ENABLED: &str = "settings.mp4MuxingEnabled";
pub const SETTINGS_ADD_DATE_TIME_TO_MP4_FILE_NAME: &str = "settings.addDateTimeToMp4FileName";
pub const SETTINGS_HLS_MUXING_ENABLED: &str = "settings.hlsMuxingEnabled";
pub const SETTINGS_ENCODER_SETTINGS_STRING: &str = "settings.encoderSettingsString";
pub const SETTINGS_HLS_LIST_SIZE: &str = "settings.hlsListSize";
pub const SETTINGS_HLS_TIME: &str = "settings.hlsTime";
pub const SETTINGS_HLS_PLAY_LIST_TYPE: &str = "settings.hlsPlayListType";
pub const SETTINGS_HLS_FLAGS: &str = "settings.hlsflags";
pub const SETTINGS_MY_SQL_CLIENT_PATH: &str = "settings.mySqlClientPath";
pub const SETTINGS_WEBRTC_ENABLED: &str = "settings.webRTCEnabled";
pub const SETTINGS_USE_ORIGINAL_WEBRTC_ENABLED: &str = "settings.useOriginalWebRTCEnabled";
pub const SETTINGS_DELETE_HLS_FILES_ON_ENDED: &str = "settings.deleteHLSFilesOnEnded";
pub const SETTINGS_LISTENER_HOOK_URL: &str = "settings.listenerHookURL";
pub const SETTINGS_ACCEPT_ONLY_STREAMS_IN_DATA_STORE: &str = "settings.acceptOnlyStreamsInDataStore";
pub const SETTINGS_TOKEN_CONTROL_ENABLED: &str = "settings.tokenControlEnabled";
pub const SETTINGS_SERVER_NAME: &str = "settings.serverName";
pub const FACEBOOK_CLIENT_ID: &str = "facebook.clientId";
pub const FACEBOOK_CLIENT_SECRET: &str = "facebook.clientSecret";
pub const PERISCOPE_CLIENT_ID: &str = "periscope.clientId";
pub const PERISCOPE_CLIENT_SECRET: &str = "periscope.clientSecret";
pub const YOUTUBE_CLIENT_ID: &str = "youtube.clientId";
pub const YOUTUBE_CLIENT_SECRET: &str = "youtube.clientSecret";
pub const SETTINGS_VOD_FOLDER: &str = "settings.vodFolder";
pub const SETTINGS_PREVIEW_OVERWRITE: &str = "settings.previewOverwrite";
pub const SETTINGS_STALKER_DB_SERVER: &str = "settings.stalkerDBServer";
pub const SETTINGS_STALKER_DB_USER_NAME: &str = "settings.stalkerDBUsername";
pub const SETTINGS_STALKER_DB_PASSWORD: &str = "settings.stalkerDBPassword";
pub const SETTINGS_OBJECT_DETECTION_ENABLED: &str = "settings.objectDetectionEnabled";
pub const SETTINGS_CREATE_PREVIEW_PERIOD: &str = "settings.createPreviewPeriod";
pub const SETTINGS_STREAM_FETCHER_RESTART_PERIOD: &str = "settings.streamFetcherRestartPeriod";
pub const SETTINGS_STREAM_FETCHER_BUFFER_TIME: &str = "settings.streamFetcherBufferTime";
pub const SETTINGS_MUXER_FINISH_SCRIPT: &str = "settings.muxerFinishScript";
pub const SETTINGS_WEBRTC_FRAME_RATE: &str = "settings.webRTCFrameRate";
pub const SETTINGS_COLLECT_SOCIAL_MEDIA_ACTIVITY: &str = "settings.collectSocialMediaActivity";
pub const SETTINGS_HASH_CONTROL_PUBLISH_ENABLED: &str = "settings.hashControlPublishEnabled";
pub const SETTINGS_HASH_CONTROL_PLAY_ENABLED: &str = "settings.hashControlPlayEnabled";
pub const TOKEN_HASH_SECRET: &str = "tokenHashSecret";
pub const SETTINGS_WEBRTC_PORT_RANGE_MIN: &str = "settings.webrtc.portRangeMin";
pub const SETTINGS_WEBRTC_PORT_RANGE_MAX: &str = "settings.webrtc.portRangeMax";
pub const SETTINGS_WEBRTC_STUN_SERVER_URI: &str = "settings.webrtc.stunServerURI";
pub const SETTINGS_WEBRTC_TCP_CANDIDATE_ENABLED: &str = "settings.webrtc.tcpCandidateEnabled";
pub const SETTINGS_ENCODING_ENCODER_NAME: &str = "settings.encoding.encoderName";
pub const SETTINGS_ENCODING_PRESET: &str = "settings.encoding.preset";
pub const SETTINGS_ENCODING_PROFILE: &str = "settings.encoding.profile";
pub const SETTINGS_ENCODING_LEVEL: &str = "settings.encoding.level";
pub const SETTINGS_ENCODING_RC: &str = "settings.encoding.rc";
pub const SETTINGS_ENCODING_SPECIFIC: &str = "settings.encoding.specific";
pub const SETTINGS_PREVIEW_HEIGHT: &str = "settings.previewHeight";
pub const SETTINGS_REMOTE_ALLOWED_CIDR: &str = "settings.remoteAllowedCIDR";
pub const SETTINGS_WRITE_STATS_TO_DATASTORE: &str = "settings.writeStatsToDatastore";
pub const SETTINGS_ENCODER_SELECTION_PREFERENCE: &str = "settings.encoderSelectionPreference";

// --- Default literals ---

/// Default allow-list: loopback only
pub const REMOTE_ALLOWED_CIDR_STR: &str = "127.0.0.1";

/// Default location of the MySQL client binaries
pub const MY_SQL_CLIENT_PATH_STR: &str = "/usr/local/antmedia/mysql";

/// Default STUN server
pub const STUN_SERVER_URI_STR: &str = "stun:stun.l.google.com:19302";

/// Default preview period in milliseconds
pub const CREATE_PREVIEW_PERIOD_STR: &str = "5000";

/// Default WebRTC encoder frame rate
pub const WEBRTC_FRAME_RATE_STR: &str = "20";

/// Default preview height in pixels
pub const PREVIEW_HEIGHT_STR: &str = "480";

/// Default encoder selection preference
pub const ENCODER_SELECTION_PREFERENCE_STR: &str = "gpu_and_cpu";

/// Keys whose values never appear in logs
pub const SECRET_KEYS: &[&str] = &[
    TOKEN_HASH_SECRET,
    FACEBOOK_CLIENT_SECRET,
    PERISCOPE_CLIENT_SECRET,
    YOUTUBE_CLIENT_SECRET,
    SETTINGS_STALKER_DB_PASSWORD,
];

/// Whether `key` holds a secret
pub fn is_secret(key: &str) -> bool {
    SECRET_KEYS.contains(&key)
}

/// Environment variable name for a setting key
///
/// Drops the `settings.` namespace, turns dots into underscores and splits
/// camelCase words: `settings.webRTCFrameRate` becomes
/// `<prefix>WEB_RTC_FRAME_RATE`.
pub fn env_var_name(prefix: &str, key: &str) -> String {
    let key = key.strip_prefix(KEY_NAMESPACE).unwrap_or(key);
    let chars: Vec<char> = key.chars().collect();
    let mut name = String::with_capacity(prefix.len() + key.len() + 8);
    name.push_str(prefix);

    for (i, &c) in chars.iter().enumerate() {
        if c == '.' {
            name.push('_');
            continue;
        }

        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let word_start = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if word_start {
                name.push('_');
            }
        }

        name.push(c.to_ascii_uppercase());
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name() {
        let cases = [
            (SETTINGS_WEBRTC_FRAME_RATE, "WEB_RTC_FRAME_RATE"),
            (SETTINGS_HLS_TIME, "HLS_TIME"),
            (SETTINGS_MP4_MUXING_ENABLED, "MP4_MUXING_ENABLED"),
            (SETTINGS_ADD_DATE_TIME_TO_MP4_FILE_NAME, "ADD_DATE_TIME_TO_MP4_FILE_NAME"),
            (SETTINGS_DELETE_HLS_FILES_ON_ENDED, "DELETE_HLS_FILES_ON_ENDED"),
            (SETTINGS_REMOTE_ALLOWED_CIDR, "REMOTE_ALLOWED_CIDR"),
            (SETTINGS_STALKER_DB_USER_NAME, "STALKER_DB_USERNAME"),
            (SETTINGS_WEBRTC_PORT_RANGE_MIN, "WEBRTC_PORT_RANGE_MIN"),
            (SETTINGS_WEBRTC_STUN_SERVER_URI, "WEBRTC_STUN_SERVER_URI"),
            (TOKEN_HASH_SECRET, "TOKEN_HASH_SECRET"),
            (FACEBOOK_CLIENT_ID, "FACEBOOK_CLIENT_ID"),
            (SETTINGS_ENCODING_RC, "ENCODING_RC"),
            (SETTINGS_MY_SQL_CLIENT_PATH, "MY_SQL_CLIENT_PATH"),
            (SETTINGS_COLLECT_SOCIAL_MEDIA_ACTIVITY, "COLLECT_SOCIAL_MEDIA_ACTIVITY"),
        ];

        for (key, expected) in cases {
            assert_eq!(env_var_name("", key), expected, "key {}", key);
        }
        assert_eq!(env_var_name(ENV_PREFIX, SETTINGS_HLS_TIME), "MEDIA_SETTINGS_HLS_TIME");
    }

    #[test]
    fn test_is_secret() {
        assert!(is_secret(TOKEN_HASH_SECRET));
        assert!(!is_secret(SETTINGS_HLS_TIME));
    }
}
