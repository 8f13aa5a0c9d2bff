//! Engine metrics.
//!
//! Recorded through the `metrics` facade; a binary decides which recorder
//! (if any) receives them.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const DETECTIONS_INGESTED_TOTAL: &str = "vfuse_detections_ingested_total";
    pub const DETECTIONS_REJECTED_TOTAL: &str = "vfuse_detections_rejected_total";
    pub const AUDIO_RECORDS_REJECTED_TOTAL: &str = "vfuse_audio_records_rejected_total";
    pub const CLUSTERS_EMITTED_TOTAL: &str = "vfuse_clusters_emitted_total";
    pub const CLUSTERS_DROPPED_TOTAL: &str = "vfuse_clusters_dropped_total";
    pub const TEMPORAL_DROPPED_TOTAL: &str = "vfuse_temporal_dropped_total";
    pub const AUDIO_CONFIRMATIONS_TOTAL: &str = "vfuse_audio_confirmations_total";
    pub const VIDEOS_PROCESSED_TOTAL: &str = "vfuse_videos_processed_total";
    pub const STAGE_DURATION_SECONDS: &str = "vfuse_stage_duration_seconds";
}

/// Record raw detections received.
pub fn record_ingested(count: usize) {
    counter!(names::DETECTIONS_INGESTED_TOTAL).increment(count as u64);
}

/// Record detections rejected for a reason.
pub fn record_rejected(reason: &'static str, count: usize) {
    if count > 0 {
        counter!(names::DETECTIONS_REJECTED_TOTAL, "reason" => reason).increment(count as u64);
    }
}

/// Record malformed speech segments and audio events dropped.
pub fn record_audio_rejected(count: usize) {
    if count > 0 {
        counter!(names::AUDIO_RECORDS_REJECTED_TOTAL).increment(count as u64);
    }
}

/// Record ensemble cluster outcomes.
pub fn record_clusters(emitted: usize, dropped: usize) {
    counter!(names::CLUSTERS_EMITTED_TOTAL).increment(emitted as u64);
    counter!(names::CLUSTERS_DROPPED_TOTAL).increment(dropped as u64);
}

/// Record detections dropped by the temporal filter.
pub fn record_temporal_dropped(count: usize) {
    counter!(names::TEMPORAL_DROPPED_TOTAL).increment(count as u64);
}

/// Record audio confirmations.
pub fn record_audio_confirmations(count: usize) {
    counter!(names::AUDIO_CONFIRMATIONS_TOTAL).increment(count as u64);
}

/// Record a completed video.
pub fn record_video_processed(mode: &'static str) {
    counter!(names::VIDEOS_PROCESSED_TOTAL, "mode" => mode).increment(1);
}

/// Record how long a stage took.
pub fn record_stage_duration(stage: &'static str, duration_secs: f64) {
    histogram!(names::STAGE_DURATION_SECONDS, "stage" => stage).record(duration_secs);
}
