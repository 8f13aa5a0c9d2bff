//! Engine entry point: one video's collected signal in, one report out.
//!
//! Stages run in two phases separated by a hard synchronization point:
//!
//! 1. Per frame, in ascending frame order: malformed-record rejection
//!    (detector outputs validated in parallel), ensemble fusion,
//!    false-positive filtering.
//! 2. Per clip, over everything accumulated: temporal consistency,
//!    audio-visual correlation, report assembly.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};
use vfuse_models::{
    AudioAnalysis, AudioEvent, AudioInput, AudioSegment, Detection, DetectorOutput, EngineInput,
    FrameDimensions, FrameSignal, PipelineStats, Transcript, VideoReport,
};

use crate::assembler::{AssemblyParts, TimelineAssembler};
use crate::config::EngineConfig;
use crate::correlator::AudioVisualCorrelator;
use crate::ensemble::EnsembleFuser;
use crate::error::{EngineError, EngineResult};
use crate::false_positive::FalsePositiveFilter;
use crate::metrics;
use crate::motion::summarize_motion;
use crate::temporal::TemporalConsistencyFilter;

/// Per-frame stage result.
#[derive(Debug, Default)]
struct FrameOutcome {
    detections: Vec<Detection>,
    ingested: usize,
    malformed: usize,
    fused: usize,
    clusters_dropped: usize,
    false_positive_rejected: usize,
}

/// The fusion and consistency engine.
#[derive(Debug, Clone, Default)]
pub struct FusionEngine {
    config: EngineConfig,
    fuser: EnsembleFuser,
    false_positive: FalsePositiveFilter,
    temporal: TemporalConsistencyFilter,
    correlator: AudioVisualCorrelator,
    assembler: TimelineAssembler,
}

impl FusionEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            fuser: EnsembleFuser::new(config.fusion.clone()),
            false_positive: FalsePositiveFilter::new(config.false_positive.clone()),
            temporal: TemporalConsistencyFilter::new(config.temporal.clone()),
            correlator: AudioVisualCorrelator::new(config.correlation.clone()),
            assembler: TimelineAssembler::new(),
            config,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fuse one video's detector outputs and correlate them with its audio.
    ///
    /// Fails only when no frames were sampled at all. Malformed detections
    /// and audio records are dropped one by one and counted in
    /// `pipeline_stats`.
    pub fn fuse_and_correlate(&self, mut input: EngineInput) -> EngineResult<VideoReport> {
        if input.frames.is_empty() {
            return Err(EngineError::no_frames(input.video_id.as_str()));
        }

        // Tracks must come out frame-ordered whatever order frames arrive in.
        input.frames.sort_by_key(|frame| frame.frame_index);

        let span = info_span!("video", video_id = %input.video_id);
        let _enter = span.enter();

        let detectors = input.resolved_detectors();
        let dimensions = input.video.dimensions();
        info!(
            frames = input.frames.len(),
            detectors = detectors.len(),
            has_audio = input.audio.is_available(),
            "Fusing video signal"
        );

        // Phase 1: per frame, in frame order
        let started = Instant::now();
        let outcomes: Vec<FrameOutcome> = input
            .frames
            .iter()
            .map(|frame| self.process_frame(frame, dimensions))
            .collect();
        metrics::record_stage_duration("frames", started.elapsed().as_secs_f64());

        let mut stats = PipelineStats::default();
        let mut accumulated: Vec<Detection> = Vec::new();
        for outcome in outcomes {
            stats.ingested += outcome.ingested;
            stats.malformed_rejected += outcome.malformed;
            stats.fused += outcome.fused;
            stats.clusters_dropped += outcome.clusters_dropped;
            stats.false_positive_rejected += outcome.false_positive_rejected;
            accumulated.extend(outcome.detections);
        }

        metrics::record_ingested(stats.ingested);
        metrics::record_rejected("malformed", stats.malformed_rejected);
        metrics::record_rejected("false_positive", stats.false_positive_rejected);
        metrics::record_clusters(stats.fused, stats.clusters_dropped);

        info!(
            ingested = stats.ingested,
            malformed = stats.malformed_rejected,
            fused = stats.fused,
            clusters_dropped = stats.clusters_dropped,
            false_positive_rejected = stats.false_positive_rejected,
            "Per-frame stages complete"
        );

        // Phase 2: per clip
        let started = Instant::now();
        let accumulated_len = accumulated.len();
        let temporal = self.temporal.apply(accumulated);
        stats.temporal_dropped = temporal.dropped(accumulated_len);
        stats.retained = temporal.kept.len();
        metrics::record_temporal_dropped(stats.temporal_dropped);
        metrics::record_stage_duration("temporal", started.elapsed().as_secs_f64());

        info!(
            tracks_kept = temporal.tracks_kept,
            tracks_dropped = temporal.tracks_dropped,
            retained = stats.retained,
            "Temporal consistency applied"
        );

        let started = Instant::now();
        let audio = match input.audio {
            AudioInput::Available { transcript, events } => {
                let (transcript, events, rejected) = sanitize_audio(transcript, events);
                stats.malformed_audio_rejected = rejected;
                metrics::record_audio_rejected(rejected);

                let fused_data = self.correlator.correlate(&temporal.kept, &transcript, &events);
                metrics::record_audio_confirmations(fused_data.audio_confirmations);
                info!(
                    moments = fused_data.timeline.len(),
                    confirmations = fused_data.audio_confirmations,
                    "Audio-visual correlation complete"
                );

                AudioAnalysis::Fused {
                    transcript,
                    audio_events: events,
                    fused_data,
                }
            }
            AudioInput::Unavailable => {
                debug!("No audio track, skipping correlation");
                AudioAnalysis::no_audio()
            }
        };
        metrics::record_stage_duration("correlation", started.elapsed().as_secs_f64());

        let started = Instant::now();
        let report = self.assembler.assemble(AssemblyParts {
            video_id: input.video_id,
            video: input.video,
            detectors,
            frames_processed: input.frames.len(),
            detections: temporal.kept,
            motion: summarize_motion(&input.motion),
            poses: input.poses,
            segments: input.segments,
            audio,
            stats,
        });
        metrics::record_stage_duration("assembly", started.elapsed().as_secs_f64());
        metrics::record_video_processed(report.metadata.processing_mode.as_str());

        info!(
            total_detections = report.summary.total_detections,
            unique_classes = report.summary.unique_classes,
            mode = %report.metadata.processing_mode,
            "Video report assembled"
        );

        Ok(report)
    }

    fn process_frame(&self, frame: &FrameSignal, dimensions: FrameDimensions) -> FrameOutcome {
        let mut outcome = FrameOutcome {
            ingested: frame.raw_detection_count(),
            ..Default::default()
        };

        // Detector outputs validate independently; order is kept by the collect.
        let validated: Vec<(DetectorOutput, usize)> = frame
            .outputs
            .par_iter()
            .map(|output| {
                let mut kept = Vec::with_capacity(output.detections.len());
                let mut malformed = 0usize;
                for detection in &output.detections {
                    match detection.validate() {
                        Ok(()) => kept.push(detection.clone().with_derived_area()),
                        Err(source) => {
                            let err = EngineError::MalformedDetection {
                                frame: frame.frame_index,
                                source,
                            };
                            warn!(detector = %output.detector.name, error = %err, "Rejecting detection");
                            malformed += 1;
                        }
                    }
                }
                (DetectorOutput::new(output.detector.clone(), kept), malformed)
            })
            .collect();

        let mut outputs: Vec<DetectorOutput> = Vec::with_capacity(validated.len());
        for (output, malformed) in validated {
            outcome.malformed += malformed;
            outputs.push(output);
        }

        let fused = self.fuser.fuse_frame(&outputs);
        if !fused.passthrough {
            outcome.fused = fused.clusters_emitted;
            outcome.clusters_dropped = fused.clusters_dropped;
        }

        let (kept, rejected) = self.false_positive.filter(fused.detections, dimensions);
        outcome.false_positive_rejected = rejected;
        outcome.detections = kept;

        debug!(
            frame = frame.frame_index,
            detectors = outputs.len(),
            kept = outcome.detections.len(),
            "Frame fused"
        );

        outcome
    }
}

/// Drop malformed segments and events, returning how many were dropped.
fn sanitize_audio(
    transcript: Transcript,
    events: Vec<AudioEvent>,
) -> (Transcript, Vec<AudioEvent>, usize) {
    let mut rejected = 0usize;

    let segments: Vec<AudioSegment> = transcript
        .segments
        .into_iter()
        .filter(|segment| match segment.validate() {
            Ok(()) => true,
            Err(source) => {
                warn!(error = %EngineError::MalformedAudio(source), "Rejecting speech segment");
                rejected += 1;
                false
            }
        })
        .collect();

    let events: Vec<AudioEvent> = events
        .into_iter()
        .filter(|event| match event.validate() {
            Ok(()) => true,
            Err(source) => {
                warn!(error = %EngineError::MalformedAudio(source), "Rejecting audio event");
                rejected += 1;
                false
            }
        })
        .collect();

    let transcript = Transcript::from_segments(transcript.language, segments);

    (transcript, events, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfuse_models::{BoundingBox, DetectorInfo, VideoId, VideoProperties};

    fn video() -> VideoProperties {
        VideoProperties {
            width: 1920,
            height: 1080,
            fps: 10.0,
            total_frames: 100,
        }
    }

    fn car(frame: u64, x1: f64) -> Detection {
        Detection::new(frame, frame as f64 / 10.0, 2, "car", 0.9, BoundingBox::new(x1, 0.0, x1 + 100.0, 100.0))
    }

    #[test]
    fn test_no_frames_is_an_error() {
        let engine = FusionEngine::with_defaults();
        let input = EngineInput::new(VideoId::from_string("empty"), video(), Vec::new());
        let err = engine.fuse_and_correlate(input).unwrap_err();
        assert!(matches!(err, EngineError::NoFrames { .. }));
    }

    #[test]
    fn test_malformed_detection_rejected_not_fatal() {
        let engine = FusionEngine::with_defaults();
        let mut inverted = car(1, 0.0);
        inverted.bbox = BoundingBox::new(100.0, 0.0, 0.0, 100.0);

        let frames = vec![FrameSignal::new(
            1,
            0.1,
            vec![DetectorOutput::new(DetectorInfo::new("primary", 0), vec![inverted, car(1, 0.0)])],
        )];
        let report = engine
            .fuse_and_correlate(EngineInput::new(VideoId::from_string("v"), video(), frames))
            .unwrap();

        assert_eq!(report.pipeline_stats.ingested, 2);
        assert_eq!(report.pipeline_stats.malformed_rejected, 1);
        assert_eq!(report.detections.len(), 1);
    }

    #[test]
    fn test_malformed_audio_rejected_not_fatal() {
        let (transcript, events, rejected) = sanitize_audio(
            Transcript::from_segments(
                "en",
                vec![
                    AudioSegment::new(2.0, 1.0, "backwards", 0.9),
                    AudioSegment::new(1.0, 2.0, "fine", 0.9),
                ],
            ),
            vec![AudioEvent::new(
                1.0,
                vfuse_models::AudioEventType::LoudSound,
                0.5,
                "Loud continuous sound",
                -1.0,
            )],
        );
        assert_eq!(rejected, 2);
        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(transcript.full_text, "fine");
        assert_eq!(transcript.language, "en");
        assert!(events.is_empty());
    }

    #[test]
    fn test_rejected_segment_text_leaves_report_transcript() {
        let engine = FusionEngine::with_defaults();
        let frames = vec![FrameSignal::new(
            0,
            0.0,
            vec![DetectorOutput::new(DetectorInfo::new("primary", 0), Vec::new())],
        )];
        let transcript = Transcript::from_segments(
            "en",
            vec![
                AudioSegment::new(5.0, 2.0, "backwards garbage", 0.9),
                AudioSegment::new(0.0, 1.0, "fine", 0.9),
            ],
        );
        let input = EngineInput::new(VideoId::from_string("v"), video(), frames)
            .with_audio(AudioInput::from_parts(Some(transcript), None));

        let report = engine.fuse_and_correlate(input).unwrap();

        assert_eq!(report.pipeline_stats.malformed_audio_rejected, 1);
        assert_eq!(report.pipeline_stats.malformed_rejected, 0);
        let fusion = report.audio_analysis.fused().unwrap();
        assert_eq!(fusion.full_transcript, "fine");
        match &report.audio_analysis {
            AudioAnalysis::Fused { transcript, .. } => {
                assert_eq!(transcript.full_text, "fine");
                assert_eq!(transcript.segments.len(), 1);
            }
            AudioAnalysis::NoAudio { .. } => panic!("expected fused audio"),
        }
    }

    #[test]
    fn test_out_of_order_frames_sorted() {
        let engine = FusionEngine::with_defaults();
        let frames: Vec<FrameSignal> = [6u64, 4, 5]
            .into_iter()
            .map(|i| {
                FrameSignal::new(
                    i,
                    i as f64 / 10.0,
                    vec![DetectorOutput::new(
                        DetectorInfo::new("primary", 0),
                        vec![car(i, i as f64).with_track(7u32)],
                    )],
                )
            })
            .collect();
        let report = engine
            .fuse_and_correlate(EngineInput::new(VideoId::from_string("v"), video(), frames))
            .unwrap();

        let order: Vec<u64> = report.detections.iter().map(|d| d.frame).collect();
        assert_eq!(order, vec![4, 5, 6]);
        assert_eq!(report.pipeline_stats.retained, 3);
    }

    #[test]
    fn test_single_detector_frames_emit_no_clusters() {
        let engine = FusionEngine::with_defaults();
        let frames: Vec<FrameSignal> = (0..3)
            .map(|i| {
                FrameSignal::new(
                    i,
                    i as f64 / 10.0,
                    vec![DetectorOutput::new(DetectorInfo::new("primary", 0), vec![car(i, 0.0)])],
                )
            })
            .collect();
        let report = engine
            .fuse_and_correlate(EngineInput::new(VideoId::from_string("v"), video(), frames))
            .unwrap();

        assert_eq!(report.pipeline_stats.ingested, 3);
        assert_eq!(report.pipeline_stats.fused, 0);
        assert_eq!(report.pipeline_stats.clusters_dropped, 0);
    }

    #[test]
    fn test_frame_order_preserved() {
        let engine = FusionEngine::with_defaults();
        let frames: Vec<FrameSignal> = (0..20)
            .map(|i| {
                FrameSignal::new(
                    i,
                    i as f64 / 10.0,
                    vec![DetectorOutput::new(DetectorInfo::new("primary", 0), vec![car(i, i as f64)])],
                )
            })
            .collect();
        let report = engine
            .fuse_and_correlate(EngineInput::new(VideoId::from_string("v"), video(), frames))
            .unwrap();

        let order: Vec<u64> = report.detections.iter().map(|d| d.frame).collect();
        assert_eq!(order, (0..20).collect::<Vec<_>>());
    }
}
