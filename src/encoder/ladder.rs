//! Adaptive bitrate ladder codec
//!
//! A ladder is serialised as a flat comma separated list of integers, three per
//! rung, in the order height, video bitrate, audio bitrate:
//!
//! ```text
//! 480,800000,128000,720,2000000,128000
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of values each rung contributes to the serialised form
pub const VALUES_PER_RUNG: usize = 3;

/// One entry of an adaptive bitrate ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncoderRung {
    /// Output height in pixels
    pub height: i32,
    /// Video bitrate in bits per second
    pub video_bitrate: i32,
    /// Audio bitrate in bits per second
    pub audio_bitrate: i32,
}

impl EncoderRung {
    /// Create a new rung
    pub fn new(height: i32, video_bitrate: i32, audio_bitrate: i32) -> Self {
        Self {
            height,
            video_bitrate,
            audio_bitrate,
        }
    }
}

/// Error raised when an encoder settings string cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEncoderSpec {
    /// A value is not an integer
    #[error("value '{token}' at position {position} is not an integer")]
    NotAnInteger {
        /// Zero-based position of the value in the list
        position: usize,
        /// The offending text
        token: String,
    },

    /// The list ends in the middle of a rung
    #[error("{values} values do not form complete rungs of {per_rung}", per_rung = VALUES_PER_RUNG)]
    IncompleteRung {
        /// Number of values in the list
        values: usize,
    },
}

/// Serialise a ladder
///
/// An empty ladder encodes to the empty string.
pub fn encode(ladder: &[EncoderRung]) -> String {
    let mut out = String::new();
    for rung in ladder {
        if !out.is_empty() {
            out.push(',');
        }
        out.push_str(&format!(
            "{},{},{}",
            rung.height, rung.video_bitrate, rung.audio_bitrate
        ));
    }
    out
}

/// Parse a serialised ladder
///
/// Fewer than three values decode to an empty ladder. Trailing empty fields
/// (`"480,800000,128000,"`) are ignored.
pub fn decode(spec: &str) -> Result<Vec<EncoderRung>, MalformedEncoderSpec> {
    let mut tokens: Vec<&str> = spec.split(',').collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    if tokens.len() < VALUES_PER_RUNG {
        return Ok(Vec::new());
    }

    if tokens.len() % VALUES_PER_RUNG != 0 {
        return Err(MalformedEncoderSpec::IncompleteRung {
            values: tokens.len(),
        });
    }

    let values = tokens
        .iter()
        .enumerate()
        .map(|(position, token)| {
            token
                .parse::<i32>()
                .map_err(|_| MalformedEncoderSpec::NotAnInteger {
                    position,
                    token: (*token).to_string(),
                })
        })
        .collect::<Result<Vec<i32>, _>>()?;

    Ok(values
        .chunks_exact(VALUES_PER_RUNG)
        .map(|chunk| EncoderRung::new(chunk[0], chunk[1], chunk[2]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let ladder = vec![
            EncoderRung::new(480, 800_000, 128_000),
            EncoderRung::new(720, 2_000_000, 128_000),
        ];
        assert_eq!(encode(&ladder), "480,800000,128000,720,2000000,128000");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_decode_two_rungs() {
        let ladder = decode("480,800000,128000,720,2000000,128000").unwrap();
        assert_eq!(
            ladder,
            vec![
                EncoderRung::new(480, 800_000, 128_000),
                EncoderRung::new(720, 2_000_000, 128_000),
            ]
        );
    }

    #[test]
    fn test_decode_short_input_is_empty() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("480").unwrap().is_empty());
        assert!(decode("480,800000").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_integer() {
        let err = decode("480,abc,128000").unwrap_err();
        assert_eq!(
            err,
            MalformedEncoderSpec::NotAnInteger {
                position: 1,
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_decode_rejects_partial_rung() {
        assert_eq!(
            decode("480,800000,128000,720").unwrap_err(),
            MalformedEncoderSpec::IncompleteRung { values: 4 }
        );
        assert_eq!(
            decode("480,800000,128000,720,2000000").unwrap_err(),
            MalformedEncoderSpec::IncompleteRung { values: 5 }
        );
    }

    #[test]
    fn test_decode_ignores_trailing_separator() {
        let ladder = decode("240,300000,64000,").unwrap();
        assert_eq!(ladder, vec![EncoderRung::new(240, 300_000, 64_000)]);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let ladder = vec![
            EncoderRung::new(1080, 4_000_000, 192_000),
            EncoderRung::new(360, 500_000, 64_000),
            EncoderRung::new(720, 2_000_000, 128_000),
        ];
        assert_eq!(decode(&encode(&ladder)).unwrap(), ladder);
        assert_eq!(decode(&encode(&[])).unwrap(), Vec::new());
    }
}
