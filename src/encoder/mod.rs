//! Encoder module
//!
//! This module contains the adaptive bitrate ladder and its string form.

pub mod ladder;

pub use ladder::{decode, encode, EncoderRung, MalformedEncoderSpec};
