//! Bundle processing: replay, classify, fuse, write.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, Instrument};
use vfuse_engine::{
    collect_frame_signal, AudioEventClassifier, DetectorProvider, EngineConfig, FusionEngine,
    MotionClassifier, PoseGate, ReplayDetector,
};
use vfuse_models::{AudioInput, EngineInput, FrameSignal, VideoReport};

use crate::bundle::SignalBundle;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::VideoLogger;
use crate::metrics;

/// Runs the engine over recorded signal bundles.
#[derive(Clone)]
pub struct VideoProcessor {
    engine: Arc<FusionEngine>,
    motion: MotionClassifier,
    poses: PoseGate,
    audio_events: AudioEventClassifier,
}

impl VideoProcessor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            motion: MotionClassifier::new(&config.signals),
            poses: PoseGate::new(&config.signals),
            audio_events: AudioEventClassifier::new(config.signals.clone()),
            engine: Arc::new(FusionEngine::new(config)),
        }
    }

    /// Turn a bundle into engine input.
    ///
    /// Every recording is replayed through the detector adapter for every
    /// sampled frame, so a detector with nothing recorded for a frame still
    /// counts as having run on it.
    pub async fn build_input(&self, bundle: SignalBundle) -> EngineInput {
        let frames = bundle.sampled_frames();
        let detectors = bundle.detectors();

        let providers: Vec<Box<dyn DetectorProvider>> = bundle
            .recordings
            .into_iter()
            .map(|recording| {
                let replay = recording
                    .frames
                    .into_iter()
                    .fold(ReplayDetector::new(recording.detector), |replay, frame| {
                        replay.with_frame(frame.frame_index, frame.detections)
                    });
                Box::new(replay) as Box<dyn DetectorProvider>
            })
            .collect();

        let mut signals: Vec<FrameSignal> = Vec::with_capacity(frames.len());
        for (frame_index, timestamp) in frames {
            signals.push(collect_frame_signal(&providers, frame_index, timestamp).await);
        }

        let motion = bundle
            .motion
            .unwrap_or_else(|| bundle.flow.iter().map(|f| self.motion.classify_stats(f)).collect());
        let poses = bundle
            .poses
            .unwrap_or_else(|| self.poses.admit_all(&bundle.pose_keypoints));
        let events = bundle.audio_events.or_else(|| {
            bundle
                .audio_windows
                .as_deref()
                .map(|windows| self.audio_events.classify_all(windows))
        });

        debug!(
            frames = signals.len(),
            motion_samples = motion.len(),
            poses = poses.len(),
            "Engine input built"
        );

        EngineInput::new(bundle.video_id, bundle.video, signals)
            .with_detectors(detectors)
            .with_motion(motion)
            .with_poses(poses)
            .with_segments(bundle.segments)
            .with_audio(AudioInput::from_parts(bundle.transcript, events))
    }

    /// Run the engine over one bundle.
    pub async fn process_bundle(&self, bundle: SignalBundle) -> WorkerResult<VideoReport> {
        let logger = VideoLogger::new(&bundle.video_id);
        let span = logger.span();
        let started = Instant::now();

        match self.run(bundle, &logger).instrument(span).await {
            Ok(report) => {
                let elapsed = started.elapsed().as_secs_f64();
                metrics::record_bundle_processed(elapsed);
                logger.log_report(&report, elapsed);
                Ok(report)
            }
            Err(e) => {
                metrics::record_bundle_failure();
                logger.log_failure(&e);
                Err(e)
            }
        }
    }

    async fn run(&self, bundle: SignalBundle, logger: &VideoLogger) -> WorkerResult<VideoReport> {
        logger.log_bundle_loaded(bundle.recordings.len());

        let input = self.build_input(bundle).await;
        logger.log_replayed(input.frames.len(), input.audio.is_available());

        let engine = Arc::clone(&self.engine);
        let report = tokio::task::spawn_blocking(move || engine.fuse_and_correlate(input))
            .await
            .map_err(|e| WorkerError::processing_failed(format!("engine task panicked: {}", e)))??;

        Ok(report)
    }

    /// Read a bundle from `input`, process it and write the report to `output`.
    pub async fn process_file(&self, input: &Path, output: &Path, pretty: bool) -> WorkerResult<VideoReport> {
        let bytes = tokio::fs::read(input).await?;
        let bundle = match SignalBundle::from_json(&bytes) {
            Ok(bundle) => bundle,
            Err(e) => {
                metrics::record_bundle_failure();
                return Err(e);
            }
        };

        let report = self.process_bundle(bundle).await?;

        let json = if pretty {
            serde_json::to_vec_pretty(&report)?
        } else {
            serde_json::to_vec(&report)?
        };
        tokio::fs::write(output, json).await?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{DetectorRecording, RecordedFrame};
    use vfuse_models::{
        AudioAnalysis, AudioSegment, AudioWindowFeatures, BoundingBox, Detection, DetectorInfo,
        FlowStats, PoseKeypoints, Transcript, VideoId, VideoProperties,
    };

    fn car(frame: u64, timestamp: f64, confidence: f64, offset: f64) -> Detection {
        Detection::new(
            frame,
            timestamp,
            2,
            "car",
            confidence,
            BoundingBox::new(offset, offset, 100.0 + offset, 100.0 + offset),
        )
    }

    fn bundle() -> SignalBundle {
        SignalBundle {
            video_id: VideoId::from_string("clip-7"),
            video: VideoProperties {
                width: 1280,
                height: 720,
                fps: 10.0,
                total_frames: 150,
            },
            recordings: vec![
                DetectorRecording {
                    detector: DetectorInfo::new("yolo11x", 0),
                    frames: vec![
                        RecordedFrame {
                            frame_index: 120,
                            timestamp: 12.0,
                            detections: vec![car(120, 12.0, 0.6, 0.0)],
                        },
                        RecordedFrame {
                            frame_index: 125,
                            timestamp: 12.5,
                            detections: vec![car(125, 12.5, 0.9, 0.0)],
                        },
                    ],
                },
                DetectorRecording {
                    detector: DetectorInfo::new("yolo11l", 1),
                    frames: vec![RecordedFrame {
                        frame_index: 120,
                        timestamp: 12.0,
                        detections: vec![car(120, 12.0, 0.8, 5.0)],
                    }],
                },
            ],
            poses: None,
            pose_keypoints: vec![PoseKeypoints {
                frame: 120,
                timestamp: 12.0,
                keypoint_confidences: vec![0.9, 0.8],
            }],
            segments: Vec::new(),
            motion: None,
            flow: vec![
                FlowStats {
                    timestamp: 12.0,
                    avg_magnitude: 3.0,
                    max_magnitude: 8.0,
                },
                FlowStats {
                    timestamp: 12.5,
                    avg_magnitude: 0.4,
                    max_magnitude: 1.0,
                },
            ],
            transcript: Some(Transcript::from_segments(
                "en",
                vec![AudioSegment::new(11.5, 13.0, "the car is driving", 0.9)],
            )),
            audio_events: None,
            audio_windows: Some(vec![AudioWindowFeatures {
                timestamp: 12.0,
                rms: 0.05,
                zero_crossing_rate: 0.02,
                spectral_centroid: 700.0,
            }]),
        }
    }

    #[tokio::test]
    async fn test_build_input_replays_every_detector_per_frame() {
        let processor = VideoProcessor::new(EngineConfig::default());
        let input = processor.build_input(bundle()).await;

        assert_eq!(input.frames.len(), 2);
        // yolo11l recorded nothing for frame 125 but still ran on it.
        assert_eq!(input.frames[1].detector_count(), 2);
        assert_eq!(input.frames[1].raw_detection_count(), 1);

        assert_eq!(input.motion.len(), 2);
        assert!(input.motion[0].significant_motion);
        assert_eq!(input.poses.len(), 1);
        assert!(input.audio.is_available());
    }

    #[tokio::test]
    async fn test_process_bundle() {
        let processor = VideoProcessor::new(EngineConfig::default());
        let report = processor.process_bundle(bundle()).await.unwrap();

        // Frame 120 fuses to 0.77; frame 125 has no second opinion and is dropped.
        assert_eq!(report.detections.len(), 1);
        assert!((report.detections[0].confidence - 0.77).abs() < 1e-9);
        assert_eq!(report.motion_analysis.frames_with_motion, 1);
        assert_eq!(report.summary.pose_detections, 1);

        match &report.audio_analysis {
            AudioAnalysis::Fused {
                audio_events,
                fused_data,
                ..
            } => {
                assert_eq!(audio_events.len(), 1);
                assert!(fused_data.timeline[0].is_confirmed("car"));
            }
            AudioAnalysis::NoAudio { .. } => panic!("expected fused audio"),
        }
    }

    #[tokio::test]
    async fn test_process_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("signals.json");
        let output = dir.path().join("report.json");
        std::fs::write(&input, serde_json::to_vec(&bundle()).unwrap()).unwrap();

        let processor = VideoProcessor::new(EngineConfig::default());
        let report = processor.process_file(&input, &output, true).await.unwrap();

        let written: VideoReport = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(written.video_id, report.video_id);
        assert_eq!(written.detections.len(), report.detections.len());
    }

    #[tokio::test]
    async fn test_malformed_records_counted_not_fatal() {
        let mut noisy = bundle();
        let mut inverted = car(120, 12.0, 0.7, 0.0);
        inverted.bbox = BoundingBox::new(100.0, 0.0, 0.0, 100.0);
        noisy.recordings[0].frames[0].detections.push(inverted);
        if let Some(transcript) = noisy.transcript.as_mut() {
            transcript.segments.push(AudioSegment::new(14.0, 13.0, "garbled", 0.9));
        }

        let processor = VideoProcessor::new(EngineConfig::default());
        let report = processor.process_bundle(noisy).await.unwrap();

        assert_eq!(report.pipeline_stats.malformed_rejected, 1);
        assert_eq!(report.pipeline_stats.malformed_audio_rejected, 1);
        assert_eq!(report.detections.len(), 1);
    }

    #[tokio::test]
    async fn test_bundle_without_frames_fails() {
        let mut empty = bundle();
        for recording in &mut empty.recordings {
            recording.frames.clear();
        }

        let processor = VideoProcessor::new(EngineConfig::default());
        let err = processor.process_bundle(empty).await.unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let processor = VideoProcessor::new(EngineConfig::default());
        let err = processor
            .process_file(&dir.path().join("absent.json"), &dir.path().join("out.json"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::Io(_)));
    }
}
