//! Everything the engine consumes for one video.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::audio::AudioInput;
use crate::detection::{DetectorInfo, FrameSignal};
use crate::signals::{MotionSample, PoseSample, SegmentationSample};
use crate::video::{VideoId, VideoProperties};

/// Collected perception signal for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngineInput {
    pub video_id: VideoId,
    pub video: VideoProperties,
    /// Configured detectors. When empty, the detectors seen in `frames` are used.
    #[serde(default)]
    pub detectors: Vec<DetectorInfo>,
    /// Sampled frames in frame order
    pub frames: Vec<FrameSignal>,
    #[serde(default)]
    pub poses: Vec<PoseSample>,
    #[serde(default)]
    pub segments: Vec<SegmentationSample>,
    #[serde(default)]
    pub motion: Vec<MotionSample>,
    #[serde(default)]
    pub audio: AudioInput,
}

impl EngineInput {
    /// Create an input with frames only; auxiliary signals start empty and
    /// audio unavailable.
    pub fn new(video_id: VideoId, video: VideoProperties, frames: Vec<FrameSignal>) -> Self {
        Self {
            video_id,
            video,
            detectors: Vec::new(),
            frames,
            poses: Vec::new(),
            segments: Vec::new(),
            motion: Vec::new(),
            audio: AudioInput::Unavailable,
        }
    }

    /// Set the configured detectors.
    pub fn with_detectors(mut self, detectors: Vec<DetectorInfo>) -> Self {
        self.detectors = detectors;
        self
    }

    /// Set pose samples.
    pub fn with_poses(mut self, poses: Vec<PoseSample>) -> Self {
        self.poses = poses;
        self
    }

    /// Set segmentation samples.
    pub fn with_segments(mut self, segments: Vec<SegmentationSample>) -> Self {
        self.segments = segments;
        self
    }

    /// Set motion samples.
    pub fn with_motion(mut self, motion: Vec<MotionSample>) -> Self {
        self.motion = motion;
        self
    }

    /// Set the audio signal.
    pub fn with_audio(mut self, audio: AudioInput) -> Self {
        self.audio = audio;
        self
    }

    /// Configured detectors in priority order.
    ///
    /// Falls back to the distinct detectors appearing in the frames.
    pub fn resolved_detectors(&self) -> Vec<DetectorInfo> {
        let mut detectors = if self.detectors.is_empty() {
            let mut seen: Vec<DetectorInfo> = Vec::new();
            for output in self.frames.iter().flat_map(|f| f.outputs.iter()) {
                if !seen.contains(&output.detector) {
                    seen.push(output.detector.clone());
                }
            }
            seen
        } else {
            self.detectors.clone()
        };
        detectors.sort_by_key(|d| d.priority);
        detectors
    }
}
