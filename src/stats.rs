//! Per-stream transcoding statistics
//!
//! A flat accumulator filled by the media pipeline while it restreams an
//! ingested stream to WebRTC viewers. Totals only grow; `publish` hands the
//! current values to whatever `metrics` recorder the process installed.

use serde::{Deserialize, Serialize};

/// Statistics for one stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStats {
    stream_id: String,
    avg_ingestion_rate: u64,
    total_decode_time: u64,
    total_decoded_frame_count: u64,
    total_encode_time: u64,
    total_encoded_packet_count: u64,
    total_delivery_time: u64,
    total_delivered_packet_count: u64,
}

impl StreamStats {
    /// Empty statistics for `stream_id`
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            ..Self::default()
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Average video ingestion rate
    pub fn avg_ingestion_rate(&self) -> u64 {
        self.avg_ingestion_rate
    }

    pub fn set_avg_ingestion_rate(&mut self, rate: u64) {
        self.avg_ingestion_rate = rate;
    }

    pub fn total_decode_time(&self) -> u64 {
        self.total_decode_time
    }

    pub fn total_decoded_frame_count(&self) -> u64 {
        self.total_decoded_frame_count
    }

    pub fn total_encode_time(&self) -> u64 {
        self.total_encode_time
    }

    pub fn total_encoded_packet_count(&self) -> u64 {
        self.total_encoded_packet_count
    }

    pub fn total_delivery_time(&self) -> u64 {
        self.total_delivery_time
    }

    pub fn total_delivered_packet_count(&self) -> u64 {
        self.total_delivered_packet_count
    }

    /// Account for `frames` decoded in `elapsed` time units
    pub fn record_decode(&mut self, elapsed: u64, frames: u64) {
        self.total_decode_time = self.total_decode_time.saturating_add(elapsed);
        self.total_decoded_frame_count = self.total_decoded_frame_count.saturating_add(frames);
    }

    /// Account for `packets` encoded in `elapsed` time units
    pub fn record_encode(&mut self, elapsed: u64, packets: u64) {
        self.total_encode_time = self.total_encode_time.saturating_add(elapsed);
        self.total_encoded_packet_count = self.total_encoded_packet_count.saturating_add(packets);
    }

    /// Account for `packets` delivered in `elapsed` time units
    pub fn record_delivery(&mut self, elapsed: u64, packets: u64) {
        self.total_delivery_time = self.total_delivery_time.saturating_add(elapsed);
        self.total_delivered_packet_count = self.total_delivered_packet_count.saturating_add(packets);
    }

    /// Report the current values as gauges labelled with the stream id
    pub fn publish(&self) {
        let values = [
            ("stream_avg_ingestion_rate", self.avg_ingestion_rate),
            ("stream_decode_time_total", self.total_decode_time),
            ("stream_decoded_frames_total", self.total_decoded_frame_count),
            ("stream_encode_time_total", self.total_encode_time),
            ("stream_encoded_packets_total", self.total_encoded_packet_count),
            ("stream_delivery_time_total", self.total_delivery_time),
            ("stream_delivered_packets_total", self.total_delivered_packet_count),
        ];

        for (name, value) in values {
            metrics::gauge!(name, "stream_id" => self.stream_id.clone()).set(value as f64);
        }
    }
}
