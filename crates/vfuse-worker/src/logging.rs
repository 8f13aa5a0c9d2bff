//! Structured per-video logging for the worker.
//!
//! Every line carries the video id; stage outcomes come straight from the
//! report's `PipelineStats` so logs and the written report always agree.

use tracing::{error, info, warn, Span};
use vfuse_models::{PipelineStats, VideoId, VideoReport};

use crate::error::WorkerError;

/// Logger bound to one video's bundle.
#[derive(Debug, Clone)]
pub struct VideoLogger {
    video_id: String,
}

impl VideoLogger {
    pub fn new(video_id: &VideoId) -> Self {
        Self {
            video_id: video_id.to_string(),
        }
    }

    /// Span covering replay, fusion and report writing for this video.
    pub fn span(&self) -> Span {
        tracing::info_span!("worker_video", video_id = %self.video_id)
    }

    pub fn log_bundle_loaded(&self, recordings: usize) {
        info!(video_id = %self.video_id, recordings, "Bundle loaded");
    }

    pub fn log_replayed(&self, frames: usize, has_audio: bool) {
        info!(video_id = %self.video_id, frames, has_audio, "Detectors replayed");
    }

    /// Stage-by-stage counts, plus a warning when input records were dropped.
    pub fn log_report(&self, report: &VideoReport, elapsed_secs: f64) {
        let stats = &report.pipeline_stats;
        info!(
            video_id = %self.video_id,
            mode = %report.metadata.processing_mode,
            ingested = stats.ingested,
            fused = stats.fused,
            clusters_dropped = stats.clusters_dropped,
            false_positive_rejected = stats.false_positive_rejected,
            temporal_dropped = stats.temporal_dropped,
            retained = stats.retained,
            elapsed_secs,
            "Video fused"
        );

        if let Some(dropped) = malformed_total(stats) {
            warn!(
                video_id = %self.video_id,
                detections = stats.malformed_rejected,
                audio_records = stats.malformed_audio_rejected,
                "Dropped {} malformed input records", dropped
            );
        }
    }

    pub fn log_failure(&self, err: &WorkerError) {
        error!(
            video_id = %self.video_id,
            input_error = err.is_input_error(),
            error = %err,
            "Video failed"
        );
    }
}

/// Malformed records dropped across detections and audio, if any.
fn malformed_total(stats: &PipelineStats) -> Option<usize> {
    let total = stats.malformed_rejected + stats.malformed_audio_rejected;
    (total > 0).then_some(total)
}
