//! Recorded signal bundle: everything captured upstream for one video.
//!
//! Auxiliary signals may arrive raw (flow stats, keypoint confidences,
//! audio window features) or already classified; raw forms are classified
//! by the worker before the engine runs. When both forms are present the
//! classified one wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vfuse_models::{
    AudioEvent, AudioWindowFeatures, Detection, DetectorInfo, FlowStats, MotionSample,
    PoseKeypoints, PoseSample, SegmentationSample, Transcript, VideoId, VideoProperties,
};

use crate::error::{WorkerError, WorkerResult};

/// One detector's detections on one sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub frame_index: u64,
    pub timestamp: f64,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

/// A detector's whole run over the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorRecording {
    pub detector: DetectorInfo,
    pub frames: Vec<RecordedFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    pub video_id: VideoId,
    pub video: VideoProperties,
    pub recordings: Vec<DetectorRecording>,
    #[serde(default)]
    pub poses: Option<Vec<PoseSample>>,
    #[serde(default)]
    pub pose_keypoints: Vec<PoseKeypoints>,
    #[serde(default)]
    pub segments: Vec<SegmentationSample>,
    #[serde(default)]
    pub motion: Option<Vec<MotionSample>>,
    #[serde(default)]
    pub flow: Vec<FlowStats>,
    #[serde(default)]
    pub transcript: Option<Transcript>,
    #[serde(default)]
    pub audio_events: Option<Vec<AudioEvent>>,
    #[serde(default)]
    pub audio_windows: Option<Vec<AudioWindowFeatures>>,
}

impl SignalBundle {
    pub fn from_json(bytes: &[u8]) -> WorkerResult<Self> {
        let bundle: Self = serde_json::from_slice(bytes)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Structural checks the engine cannot express per record.
    pub fn validate(&self) -> WorkerResult<()> {
        if self.recordings.is_empty() {
            return Err(WorkerError::invalid_bundle("bundle has no detector recordings"));
        }

        let mut names: Vec<&str> = self.recordings.iter().map(|r| r.detector.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err(WorkerError::invalid_bundle("detector names must be unique"));
        }

        Ok(())
    }

    /// Every sampled frame across all recordings, ascending, with the
    /// timestamp of its first recording.
    pub fn sampled_frames(&self) -> Vec<(u64, f64)> {
        let mut frames: BTreeMap<u64, f64> = BTreeMap::new();
        for recording in &self.recordings {
            for frame in &recording.frames {
                frames.entry(frame.frame_index).or_insert(frame.timestamp);
            }
        }
        frames.into_iter().collect()
    }

    /// Detectors in priority order.
    pub fn detectors(&self) -> Vec<DetectorInfo> {
        let mut detectors: Vec<DetectorInfo> = self.recordings.iter().map(|r| r.detector.clone()).collect();
        detectors.sort_by_key(|d| d.priority);
        detectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(name: &str, priority: u8, frames: &[(u64, f64)]) -> DetectorRecording {
        DetectorRecording {
            detector: DetectorInfo::new(name, priority),
            frames: frames
                .iter()
                .map(|(frame_index, timestamp)| RecordedFrame {
                    frame_index: *frame_index,
                    timestamp: *timestamp,
                    detections: Vec::new(),
                })
                .collect(),
        }
    }

    fn bundle(recordings: Vec<DetectorRecording>) -> SignalBundle {
        SignalBundle {
            video_id: VideoId::from_string("clip"),
            video: VideoProperties::default(),
            recordings,
            poses: None,
            pose_keypoints: Vec::new(),
            segments: Vec::new(),
            motion: None,
            flow: Vec::new(),
            transcript: None,
            audio_events: None,
            audio_windows: None,
        }
    }

    #[test]
    fn test_sampled_frames_union() {
        let b = bundle(vec![
            recording("a", 0, &[(0, 0.0), (10, 1.0)]),
            recording("b", 1, &[(5, 0.5), (10, 1.0)]),
        ]);
        assert_eq!(b.sampled_frames(), vec![(0, 0.0), (5, 0.5), (10, 1.0)]);
    }

    #[test]
    fn test_detectors_priority_ordered() {
        let b = bundle(vec![recording("b", 2, &[]), recording("a", 0, &[])]);
        let names: Vec<String> = b.detectors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_validation() {
        assert!(bundle(Vec::new()).validate().is_err());
        assert!(bundle(vec![recording("a", 0, &[]), recording("a", 1, &[])]).validate().is_err());
        assert!(bundle(vec![recording("a", 0, &[])]).validate().is_ok());
    }

    #[test]
    fn test_minimal_json() {
        let json = r#"{
            "video_id": "clip-1",
            "video": {"width": 640, "height": 480, "fps": 30.0, "total_frames": 90},
            "recordings": [
                {"detector": {"name": "yolo11x", "priority": 0}, "frames": [
                    {"frame_index": 0, "timestamp": 0.0}
                ]}
            ]
        }"#;
        let b = SignalBundle::from_json(json.as_bytes()).unwrap();
        assert_eq!(b.video_id.as_str(), "clip-1");
        assert!(b.transcript.is_none());
        assert_eq!(b.sampled_frames().len(), 1);
    }
}
