//! Auxiliary per-frame signals: motion, pose and segmentation samples.
//!
//! These pass through the engine untouched; only their raw forms
//! (`FlowStats`, keypoint confidences, `AudioWindowFeatures`) are
//! classified on the way in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Optical-flow motion sample for one sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MotionSample {
    /// Timestamp in seconds
    pub timestamp: f64,
    /// Mean flow magnitude over the frame
    pub avg_magnitude: f64,
    /// Peak flow magnitude over the frame
    pub max_magnitude: f64,
    /// Whether the frame shows significant motion
    pub significant_motion: bool,
}

/// Raw optical-flow statistics before classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlowStats {
    /// Timestamp in seconds
    pub timestamp: f64,
    /// Mean flow magnitude
    pub avg_magnitude: f64,
    /// Peak flow magnitude
    pub max_magnitude: f64,
}

/// Motion totals over a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MotionSummary {
    /// Number of motion samples
    pub total_frames: usize,
    /// Samples flagged as significant motion
    pub frames_with_motion: usize,
}

/// A pose detection accepted for a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseSample {
    /// Frame index
    pub frame: u64,
    /// Timestamp in seconds
    pub timestamp: f64,
    /// Mean keypoint confidence
    pub confidence: f64,
}

/// Raw pose keypoint confidences for one person on one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseKeypoints {
    /// Frame index
    pub frame: u64,
    /// Timestamp in seconds
    pub timestamp: f64,
    /// Per-keypoint confidences
    pub keypoint_confidences: Vec<f64>,
}

/// A segmentation mask summary for one object on one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentationSample {
    /// Frame index
    pub frame: u64,
    /// Timestamp in seconds
    pub timestamp: f64,
    /// Segmented class name
    pub class_name: String,
    /// Mask confidence
    pub confidence: f64,
    /// Mask area in pixels
    pub mask_area: f64,
}

/// Acoustic features for one analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudioWindowFeatures {
    /// Window start in seconds
    pub timestamp: f64,
    /// Root-mean-square energy
    pub rms: f64,
    /// Mean zero-crossing rate
    pub zero_crossing_rate: f64,
    /// Mean spectral centroid in Hz
    pub spectral_centroid: f64,
}
