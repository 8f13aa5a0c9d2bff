//! Error types for the fusion engine.

use thiserror::Error;
use vfuse_models::ModelError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while fusing a video's signal.
///
/// Only `NoFrames` aborts `fuse_and_correlate`; the malformed-input variants
/// describe single records that are rejected while the run continues.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No sampled frames were provided for video {video_id}")]
    NoFrames { video_id: String },

    #[error("Malformed detection on frame {frame}: {source}")]
    MalformedDetection {
        frame: u64,
        #[source]
        source: ModelError,
    },

    #[error("Malformed audio record: {0}")]
    MalformedAudio(#[source] ModelError),

    #[error("Detector {detector} failed on frame {frame}: {message}")]
    ProviderFailed {
        detector: String,
        frame: u64,
        message: String,
    },
}

impl EngineError {
    /// Create a missing-frames error.
    pub fn no_frames(video_id: impl Into<String>) -> Self {
        Self::NoFrames {
            video_id: video_id.into(),
        }
    }

    /// Create a detector failure error.
    pub fn provider_failed(detector: impl Into<String>, frame: u64, message: impl Into<String>) -> Self {
        Self::ProviderFailed {
            detector: detector.into(),
            frame,
            message: message.into(),
        }
    }
}
