//! Final report assembly.
//!
//! Pure aggregation over already-filtered data; no detection is added or
//! removed here.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use vfuse_models::{
    AudioAnalysis, Detection, DetectorInfo, DominantObject, MotionSummary, PipelineStats,
    PoseSample, ProcessingMode, ReportSummary, SegmentationSample, VideoId, VideoMetadata,
    VideoProperties, VideoReport, REPORT_VERSION,
};

/// Number of classes ranked in `dominant_objects`.
pub const DOMINANT_OBJECT_LIMIT: usize = 10;

/// Everything the assembler folds into a report.
#[derive(Debug, Clone)]
pub struct AssemblyParts {
    pub video_id: VideoId,
    pub video: VideoProperties,
    pub detectors: Vec<DetectorInfo>,
    pub frames_processed: usize,
    pub detections: Vec<Detection>,
    pub poses: Vec<PoseSample>,
    pub segments: Vec<SegmentationSample>,
    pub motion: MotionSummary,
    pub audio: AudioAnalysis,
    pub stats: PipelineStats,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineAssembler;

impl TimelineAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the immutable report.
    pub fn assemble(&self, parts: AssemblyParts) -> VideoReport {
        let processing_mode = ProcessingMode::for_detector_count(parts.detectors.len());
        let has_audio = parts.audio.has_audio();

        let metadata = VideoMetadata {
            video_id: parts.video_id.clone(),
            width: parts.video.width,
            height: parts.video.height,
            fps: parts.video.fps,
            total_frames: parts.video.total_frames,
            duration: parts.video.duration(),
            frames_processed: parts.frames_processed,
            processing_mode,
            ensemble_models: parts.detectors.iter().map(|d| d.name.clone()).collect(),
            has_audio,
        };

        let summary = summarize(
            &parts.detections,
            parts.poses.len(),
            processing_mode,
            &parts.audio,
        );

        VideoReport {
            report_version: REPORT_VERSION,
            video_id: parts.video_id,
            generated_at: Utc::now(),
            metadata,
            detections: parts.detections,
            summary,
            motion_analysis: parts.motion,
            poses: parts.poses,
            segments: parts.segments,
            audio_analysis: parts.audio,
            pipeline_stats: parts.stats,
        }
    }
}

fn summarize(
    detections: &[Detection],
    pose_detections: usize,
    processing_mode: ProcessingMode,
    audio: &AudioAnalysis,
) -> ReportSummary {
    let mut by_class: BTreeMap<String, usize> = BTreeMap::new();
    let mut tracked = HashSet::new();
    for detection in detections {
        *by_class.entry(detection.class_name.clone()).or_insert(0) += 1;
        if let Some(track_id) = detection.track_id {
            tracked.insert(track_id);
        }
    }

    let (speech_segments, audio_confirmations) = match audio {
        AudioAnalysis::Fused {
            transcript,
            fused_data,
            ..
        } => (
            Some(transcript.segments.len()),
            Some(fused_data.audio_confirmations),
        ),
        AudioAnalysis::NoAudio { .. } => (None, None),
    };

    ReportSummary {
        total_detections: detections.len(),
        unique_classes: by_class.len(),
        by_class,
        unique_tracked_objects: tracked.len(),
        pose_detections,
        dominant_objects: dominant_objects(detections, DOMINANT_OBJECT_LIMIT),
        processing_mode,
        has_audio: audio.has_audio(),
        speech_segments,
        audio_confirmations,
    }
}

/// Rank classes by count, descending; ties keep first-encountered order.
pub fn dominant_objects(detections: &[Detection], limit: usize) -> Vec<DominantObject> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for detection in detections {
        let name = detection.class_name.as_str();
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    let mut ranked: Vec<DominantObject> = order
        .into_iter()
        .map(|name| DominantObject {
            class_name: name.to_string(),
            count: counts.get(name).copied().unwrap_or(0),
        })
        .collect();
    // Stable sort keeps first-encountered order among equal counts.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}
