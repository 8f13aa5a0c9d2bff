//! Rule-based rejection of implausible boxes.

use std::fmt;

use vfuse_models::{Detection, FrameDimensions};

use crate::config::FalsePositiveConfig;

/// Why a detection was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Box smaller than the area floor
    TooSmall,
    /// Width/height ratio outside the allowed range
    DegenerateAspect,
    /// High-risk class below its confidence floor
    HighRiskLowConfidence,
}

impl Rejection {
    /// Returns the reason as a snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::TooSmall => "too_small",
            Rejection::DegenerateAspect => "degenerate_aspect",
            Rejection::HighRiskLowConfidence => "high_risk_low_confidence",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stateless predicate over single detections.
#[derive(Debug, Clone, Default)]
pub struct FalsePositiveFilter {
    config: FalsePositiveConfig,
}

impl FalsePositiveFilter {
    /// Create a filter with the given configuration.
    pub fn new(config: FalsePositiveConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FalsePositiveConfig::default())
    }

    /// Check one detection.
    ///
    /// `_frame` is accepted for frame-relative checks; none use it yet.
    pub fn evaluate(&self, detection: &Detection, _frame: FrameDimensions) -> Result<(), Rejection> {
        if detection.bbox.area() < self.config.min_area {
            return Err(Rejection::TooSmall);
        }

        let aspect = detection.bbox.aspect_ratio();
        if aspect < self.config.min_aspect_ratio || aspect > self.config.max_aspect_ratio {
            return Err(Rejection::DegenerateAspect);
        }

        if detection.confidence < self.config.high_risk_min_confidence
            && self
                .config
                .high_risk_classes
                .iter()
                .any(|c| c == &detection.class_name)
        {
            return Err(Rejection::HighRiskLowConfidence);
        }

        Ok(())
    }

    /// Whether a detection passes.
    pub fn accepts(&self, detection: &Detection, frame: FrameDimensions) -> bool {
        self.evaluate(detection, frame).is_ok()
    }

    /// Keep the detections that pass, returning them with the rejection count.
    pub fn filter(&self, detections: Vec<Detection>, frame: FrameDimensions) -> (Vec<Detection>, usize) {
        let before = detections.len();
        let kept: Vec<Detection> = detections
            .into_iter()
            .filter(|d| self.accepts(d, frame))
            .collect();
        let rejected = before - kept.len();
        (kept, rejected)
    }
}
