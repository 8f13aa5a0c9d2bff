//! Detector adapter trait.
//!
//! Every detector, whatever model or library sits behind it, yields plain
//! [`Detection`] values for a frame. The engine never sees anything else.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;
use vfuse_models::{Detection, DetectorInfo, DetectorOutput, FrameSignal};

use crate::error::EngineResult;

/// Per-frame object detector.
#[async_trait]
pub trait DetectorProvider: Send + Sync {
    /// Detector name for logging and report metadata.
    fn name(&self) -> &str;

    /// Merge priority; 0 is the primary detector.
    fn priority(&self) -> u8;

    /// Detect objects in one sampled frame.
    async fn detect(&self, frame_index: u64, timestamp: f64) -> EngineResult<Vec<Detection>>;

    /// Descriptor used in detector outputs.
    fn info(&self) -> DetectorInfo {
        DetectorInfo::new(self.name(), self.priority())
    }
}

/// Run every provider on one frame concurrently.
///
/// Outputs are ordered by provider priority. A failing provider contributes
/// no output for this frame; the others are kept.
pub async fn collect_frame_signal(
    providers: &[Box<dyn DetectorProvider>],
    frame_index: u64,
    timestamp: f64,
) -> FrameSignal {
    let results = join_all(
        providers
            .iter()
            .map(|provider| async move { (provider.info(), provider.detect(frame_index, timestamp).await) }),
    )
    .await;

    let mut outputs: Vec<DetectorOutput> = Vec::with_capacity(results.len());
    for (info, result) in results {
        match result {
            Ok(detections) => outputs.push(DetectorOutput::new(info, detections)),
            Err(e) => {
                warn!(
                    detector = %info.name,
                    frame = frame_index,
                    error = %e,
                    "Detector failed, skipping its output for this frame"
                );
            }
        }
    }
    outputs.sort_by_key(|o| o.detector.priority);

    FrameSignal::new(frame_index, timestamp, outputs)
}

/// Replays a recorded detector run.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    info: DetectorInfo,
    frames: HashMap<u64, Vec<Detection>>,
}

impl ReplayDetector {
    pub fn new(info: DetectorInfo) -> Self {
        Self {
            info,
            frames: HashMap::new(),
        }
    }

    /// Record the detections for a frame, replacing any earlier recording.
    pub fn with_frame(mut self, frame_index: u64, detections: Vec<Detection>) -> Self {
        self.frames.insert(frame_index, detections);
        self
    }
}

#[async_trait]
impl DetectorProvider for ReplayDetector {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn priority(&self) -> u8 {
        self.info.priority
    }

    async fn detect(&self, frame_index: u64, _timestamp: f64) -> EngineResult<Vec<Detection>> {
        Ok(self.frames.get(&frame_index).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use vfuse_models::BoundingBox;

    struct FailingDetector;

    #[async_trait]
    impl DetectorProvider for FailingDetector {
        fn name(&self) -> &str {
            "broken"
        }

        fn priority(&self) -> u8 {
            1
        }

        async fn detect(&self, frame_index: u64, _timestamp: f64) -> EngineResult<Vec<Detection>> {
            Err(EngineError::provider_failed("broken", frame_index, "model not loaded"))
        }
    }

    fn car(frame: u64) -> Detection {
        Detection::new(frame, 1.0, 2, "car", 0.8, BoundingBox::new(0.0, 0.0, 100.0, 100.0))
    }

    #[tokio::test]
    async fn test_outputs_ordered_by_priority() {
        let providers: Vec<Box<dyn DetectorProvider>> = vec![
            Box::new(ReplayDetector::new(DetectorInfo::new("secondary", 2)).with_frame(10, vec![car(10)])),
            Box::new(ReplayDetector::new(DetectorInfo::new("primary", 0)).with_frame(10, vec![car(10)])),
        ];

        let signal = collect_frame_signal(&providers, 10, 1.0).await;
        assert_eq!(signal.frame_index, 10);
        assert_eq!(signal.detector_count(), 2);
        assert_eq!(signal.outputs[0].detector.name, "primary");
        assert_eq!(signal.outputs[1].detector.name, "secondary");
    }

    #[tokio::test]
    async fn test_failed_provider_dropped() {
        let providers: Vec<Box<dyn DetectorProvider>> = vec![
            Box::new(ReplayDetector::new(DetectorInfo::new("primary", 0)).with_frame(3, vec![car(3)])),
            Box::new(FailingDetector),
        ];

        let signal = collect_frame_signal(&providers, 3, 0.3).await;
        assert_eq!(signal.detector_count(), 1);
        assert_eq!(signal.raw_detection_count(), 1);
    }

    #[tokio::test]
    async fn test_unrecorded_frame_yields_empty_output() {
        let replay = ReplayDetector::new(DetectorInfo::new("primary", 0)).with_frame(1, vec![car(1)]);
        let providers: Vec<Box<dyn DetectorProvider>> = vec![Box::new(replay)];
        let signal = collect_frame_signal(&providers, 2, 0.2).await;
        assert_eq!(signal.detector_count(), 1);
        assert!(signal.outputs[0].detections.is_empty());
    }
}
