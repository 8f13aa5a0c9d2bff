//! Object detections and the per-frame detector outputs they arrive in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bbox::BoundingBox;
use crate::error::{validate_confidence, validate_timestamp, ModelError};

/// Identity of a tracked object, assigned by an upstream tracker.
///
/// The engine only reads and forwards track ids; it never allocates one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TrackId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A single object detection on one sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Source frame index (0-based)
    pub frame: u64,
    /// Timestamp in seconds
    pub timestamp: f64,
    /// Detector class id
    pub class_id: u32,
    /// Human-readable class name (e.g. "car")
    pub class_name: String,
    /// Detection confidence (0.0-1.0)
    pub confidence: f64,
    /// Bounding box in pixels
    pub bbox: BoundingBox,
    /// Track id, present only when the detector performs temporal association
    #[serde(default)]
    pub track_id: Option<TrackId>,
    /// Box area in pixels, always derived from `bbox`
    #[serde(default)]
    pub area: f64,
}

impl Detection {
    /// Create a new untracked detection.
    pub fn new(
        frame: u64,
        timestamp: f64,
        class_id: u32,
        class_name: impl Into<String>,
        confidence: f64,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            frame,
            timestamp,
            class_id,
            class_name: class_name.into(),
            confidence,
            bbox,
            track_id: None,
            area: bbox.area(),
        }
    }

    /// Attach a track id.
    pub fn with_track(mut self, track_id: impl Into<TrackId>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    /// Recompute the derived area from the box.
    ///
    /// Deserialized detections may carry a stale or missing area.
    pub fn with_derived_area(mut self) -> Self {
        self.area = self.bbox.area();
        self
    }

    /// Check box geometry, confidence range and timestamp.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.bbox.validate()?;
        validate_confidence(self.confidence)?;
        validate_timestamp(self.timestamp)
    }
}

/// Descriptor of one configured detector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct DetectorInfo {
    /// Detector name (e.g. "yolo11x")
    pub name: String,
    /// Priority rank, 0 = primary. Lower ranks win track-id tie-breaks.
    pub priority: u8,
}

impl DetectorInfo {
    /// Create a new detector descriptor.
    pub fn new(name: impl Into<String>, priority: u8) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

/// Detections produced by one detector for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectorOutput {
    /// Which detector produced these detections
    pub detector: DetectorInfo,
    /// Raw detections, in the detector's own order
    pub detections: Vec<Detection>,
}

impl DetectorOutput {
    /// Create a new detector output.
    pub fn new(detector: DetectorInfo, detections: Vec<Detection>) -> Self {
        Self {
            detector,
            detections,
        }
    }
}

/// All detector outputs gathered for one sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameSignal {
    /// Frame index (0-based)
    pub frame_index: u64,
    /// Frame timestamp in seconds
    pub timestamp: f64,
    /// One entry per detector that ran on this frame
    pub outputs: Vec<DetectorOutput>,
}

impl FrameSignal {
    /// Create a frame signal.
    pub fn new(frame_index: u64, timestamp: f64, outputs: Vec<DetectorOutput>) -> Self {
        Self {
            frame_index,
            timestamp,
            outputs,
        }
    }

    /// Number of detectors that contributed to this frame.
    pub fn detector_count(&self) -> usize {
        self.outputs.len()
    }

    /// Total raw detections across all detectors.
    pub fn raw_detection_count(&self) -> usize {
        self.outputs.iter().map(|o| o.detections.len()).sum()
    }
}
