//! Pose admission by mean keypoint confidence.

use vfuse_models::{PoseKeypoints, PoseSample};

use crate::config::SignalConfig;

#[derive(Debug, Clone, Copy)]
pub struct PoseGate {
    min_confidence: f64,
}

impl Default for PoseGate {
    fn default() -> Self {
        Self::new(&SignalConfig::default())
    }
}

impl PoseGate {
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            min_confidence: config.min_pose_confidence,
        }
    }

    /// Admit a pose when its mean keypoint confidence is above the floor.
    ///
    /// Poses with no keypoints are never admitted.
    pub fn admit(&self, frame: u64, timestamp: f64, keypoint_confidences: &[f64]) -> Option<PoseSample> {
        if keypoint_confidences.is_empty() {
            return None;
        }

        let mean = keypoint_confidences.iter().sum::<f64>() / keypoint_confidences.len() as f64;
        (mean > self.min_confidence).then_some(PoseSample {
            frame,
            timestamp,
            confidence: mean,
        })
    }

    /// Admit every qualifying pose from a batch.
    pub fn admit_all(&self, poses: &[PoseKeypoints]) -> Vec<PoseSample> {
        poses
            .iter()
            .filter_map(|p| self.admit(p.frame, p.timestamp, &p.keypoint_confidences))
            .collect()
    }
}
