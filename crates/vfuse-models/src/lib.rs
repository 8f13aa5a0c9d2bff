//! Shared data models for the VFuse perception fusion engine.
//!
//! This crate provides Serde-serializable types for:
//! - Bounding boxes, detections and per-frame detector outputs
//! - Speech transcripts and audio events
//! - Motion, pose and segmentation samples
//! - The audio-visual timeline and the final video report

pub mod audio;
pub mod bbox;
pub mod detection;
pub mod error;
pub mod input;
pub mod report;
pub mod signals;
pub mod timeline;
pub mod video;

// Re-export common types
pub use audio::{AudioEvent, AudioEventType, AudioInput, AudioSegment, Transcript};
pub use bbox::BoundingBox;
pub use detection::{Detection, DetectorInfo, DetectorOutput, FrameSignal, TrackId};
pub use error::ModelError;
pub use input::EngineInput;
pub use report::{
    DominantObject, PipelineStats, ProcessingMode, ReportSummary, VideoMetadata, VideoReport,
    REPORT_VERSION,
};
pub use signals::{
    AudioWindowFeatures, FlowStats, MotionSample, MotionSummary, PoseKeypoints, PoseSample,
    SegmentationSample,
};
pub use timeline::{AudioAnalysis, AudioBucket, AudioVisualFusion, TimelineEntry, VisualBucket};
pub use video::{FrameDimensions, VideoId, VideoProperties};
