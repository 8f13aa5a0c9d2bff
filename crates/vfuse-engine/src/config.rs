//! Configuration for the fusion engine.
//!
//! Defaults are the fixed thresholds the engine is calibrated to; only the
//! area floor is meant to be tuned.

use serde::{Deserialize, Serialize};

/// Ensemble fusion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    /// IoU a box must exceed against the cluster seed to join it (default: 0.5)
    pub iou_threshold: f64,

    /// Multiplier applied to the mean confidence of an agreed cluster (default: 1.1)
    pub agreement_bonus: f64,

    /// Distinct detectors a cluster needs before it is emitted (default: 2)
    pub min_agreeing_detectors: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.5,
            agreement_bonus: 1.1,
            min_agreeing_detectors: 2,
        }
    }
}

/// Geometric false-positive rejection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FalsePositiveConfig {
    /// Minimum box area in pixels (default: 200)
    pub min_area: f64,

    /// Minimum width/height ratio (default: 0.1)
    pub min_aspect_ratio: f64,

    /// Maximum width/height ratio (default: 10.0)
    pub max_aspect_ratio: f64,

    /// Large stationary classes that are often misclassified
    pub high_risk_classes: Vec<String>,

    /// Confidence floor for high-risk classes (default: 0.70)
    pub high_risk_min_confidence: f64,
}

impl Default for FalsePositiveConfig {
    fn default() -> Self {
        Self {
            min_area: 200.0,
            min_aspect_ratio: 0.1,
            max_aspect_ratio: 10.0,
            high_risk_classes: ["refrigerator", "oven", "microwave", "sink", "toilet"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            high_risk_min_confidence: 0.70,
        }
    }
}

/// Clip-level temporal consistency settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalFilterConfig {
    /// Detections a track needs to be kept (default: 3)
    pub min_track_length: usize,

    /// Confidence floor for detections without a track id (default: 0.75)
    pub untracked_min_confidence: f64,
}

impl Default for TemporalFilterConfig {
    fn default() -> Self {
        Self {
            min_track_length: 3,
            untracked_min_confidence: 0.75,
        }
    }
}

/// Audio-visual correlation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Audio events closer than this to a bucket start belong to it, in seconds (default: 1.0)
    pub event_window_secs: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            event_window_secs: 1.0,
        }
    }
}

/// Thresholds for classifying raw auxiliary signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    // === Motion ===
    /// Mean flow magnitude above which a frame has significant motion (default: 2.0)
    pub significant_motion_magnitude: f64,

    // === Pose ===
    /// Mean keypoint confidence a pose must exceed (default: 0.5)
    pub min_pose_confidence: f64,

    // === Audio events ===
    /// RMS below which a window is silence (default: 0.01)
    pub silence_rms: f64,

    /// RMS above which a window is loud (default: 0.1)
    pub loud_rms: f64,

    /// Zero-crossing rate separating sharp from continuous loud sounds (default: 0.15)
    pub sharp_zero_crossing_rate: f64,

    /// RMS a medium-volume window needs (default: 0.03)
    pub medium_rms: f64,

    /// Spectral centroid below which a window is low frequency, in Hz (default: 1000)
    pub low_frequency_centroid: f64,

    /// Spectral centroid above which a window is high frequency, in Hz (default: 3000)
    pub high_frequency_centroid: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            significant_motion_magnitude: 2.0,
            min_pose_confidence: 0.5,
            silence_rms: 0.01,
            loud_rms: 0.1,
            sharp_zero_crossing_rate: 0.15,
            medium_rms: 0.03,
            low_frequency_centroid: 1000.0,
            high_frequency_centroid: 3000.0,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub fusion: FusionConfig,
    pub false_positive: FalsePositiveConfig,
    pub temporal: TemporalFilterConfig,
    pub correlation: CorrelationConfig,
    pub signals: SignalConfig,
}

impl EngineConfig {
    /// Builder-style setter for the false-positive area floor.
    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.false_positive.min_area = min_area.max(0.0);
        self
    }
}
