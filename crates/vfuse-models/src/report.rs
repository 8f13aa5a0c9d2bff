//! Final per-video report.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::detection::Detection;
use crate::signals::{MotionSummary, PoseSample, SegmentationSample};
use crate::timeline::AudioAnalysis;
use crate::video::VideoId;

/// Version of the report format.
/// Increment this when the structure changes.
pub const REPORT_VERSION: u32 = 1;

/// How detections were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Several detectors were cross-validated.
    Ensemble,
    /// One detector; its output passed through unfused.
    SingleDetector,
}

impl ProcessingMode {
    /// Pick the mode for a number of configured detectors.
    pub fn for_detector_count(count: usize) -> Self {
        if count > 1 {
            ProcessingMode::Ensemble
        } else {
            ProcessingMode::SingleDetector
        }
    }

    /// Returns the mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Ensemble => "ensemble",
            ProcessingMode::SingleDetector => "single_detector",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Video-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetadata {
    pub video_id: VideoId,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: u64,
    /// Duration in seconds
    pub duration: f64,
    /// Number of sampled frames that reached the engine
    pub frames_processed: usize,
    pub processing_mode: ProcessingMode,
    /// Detector names in priority order
    pub ensemble_models: Vec<String>,
    pub has_audio: bool,
}

/// A class and how often it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DominantObject {
    #[serde(rename = "type")]
    pub class_name: String,
    pub count: usize,
}

/// Summary statistics over the final detections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    pub total_detections: usize,
    pub by_class: BTreeMap<String, usize>,
    pub unique_classes: usize,
    pub unique_tracked_objects: usize,
    /// Accepted pose detections
    pub pose_detections: usize,
    /// Top classes by count, descending
    pub dominant_objects: Vec<DominantObject>,
    pub processing_mode: ProcessingMode,
    pub has_audio: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_segments: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_confirmations: Option<usize>,
}

/// Counts of what each engine stage kept and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PipelineStats {
    /// Raw detections received from all detectors
    pub ingested: usize,
    /// Detections rejected as malformed
    pub malformed_rejected: usize,
    /// Audio segments and events rejected as malformed
    pub malformed_audio_rejected: usize,
    /// Clusters emitted by ensemble fusion; zero on single-detector
    /// (passthrough) frames
    pub fused: usize,
    /// Clusters dropped for lack of agreement
    pub clusters_dropped: usize,
    /// Detections rejected by the false-positive filter
    pub false_positive_rejected: usize,
    /// Detections dropped by the temporal filter
    pub temporal_dropped: usize,
    /// Detections in the final report
    pub retained: usize,
}

/// Complete, immutable description of one processed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoReport {
    /// Schema version
    pub report_version: u32,
    pub video_id: VideoId,
    /// When the report was assembled
    pub generated_at: DateTime<Utc>,
    pub metadata: VideoMetadata,
    /// Fused, filtered, temporally validated detections
    pub detections: Vec<Detection>,
    pub summary: ReportSummary,
    pub motion_analysis: MotionSummary,
    /// Pose samples, passed through unchanged
    pub poses: Vec<PoseSample>,
    /// Segmentation samples, passed through unchanged
    pub segments: Vec<SegmentationSample>,
    pub audio_analysis: AudioAnalysis,
    pub pipeline_stats: PipelineStats,
}

impl VideoReport {
    /// Whether the report's version matches the current format.
    pub fn is_current_version(&self) -> bool {
        self.report_version == REPORT_VERSION
    }
}
