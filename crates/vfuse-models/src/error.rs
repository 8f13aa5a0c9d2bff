//! Validation errors for data-model values.

use thiserror::Error;

/// Reasons a single input record is malformed.
///
/// These never abort a run: the engine rejects the offending record and
/// keeps going with the rest.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Invalid bounding box ({x1}, {y1}, {x2}, {y2}): corners must be finite with x1 < x2 and y1 < y2")]
    InvalidBox { x1: f64, y1: f64, x2: f64, y2: f64 },

    #[error("Confidence {0} is outside [0, 1]")]
    InvalidConfidence(f64),

    #[error("Timestamp {0} must be finite and non-negative")]
    InvalidTimestamp(f64),

    #[error("Audio segment [{start}, {end}) must have start < end")]
    InvalidSegment { start: f64, end: f64 },

    #[error("Audio energy {0} must be finite and non-negative")]
    InvalidEnergy(f64),
}

/// Check that a confidence lies in `[0, 1]`.
pub fn validate_confidence(confidence: f64) -> Result<(), ModelError> {
    if (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(ModelError::InvalidConfidence(confidence))
    }
}

/// Check that a timestamp is finite and non-negative.
pub fn validate_timestamp(timestamp: f64) -> Result<(), ModelError> {
    if timestamp.is_finite() && timestamp >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidTimestamp(timestamp))
    }
}
