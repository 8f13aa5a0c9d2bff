//! Audio-visual timeline schema.
//!
//! One entry per occupied one-second bucket:
//! ```json
//! {
//!   "timestamp": 12,
//!   "visual": { "objects": { "car": 2 }, "total": 2 },
//!   "audio": { "speech": "the car is driving", "events": [] },
//!   "confirmed_by_audio": ["car"]
//! }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::audio::{AudioEvent, Transcript};

/// Visual side of a timeline bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct VisualBucket {
    /// Detection count per class name
    pub objects: BTreeMap<String, usize>,
    /// Total detections in the bucket
    pub total: usize,
}

/// Audio side of a timeline bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct AudioBucket {
    /// Text of the first speech segment covering the bucket
    pub speech: Option<String>,
    /// Descriptions of audio events near the bucket
    pub events: Vec<String>,
}

/// One second of the fused timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineEntry {
    /// Bucket index, i.e. whole seconds since the start of the video
    pub timestamp: u64,
    /// Visual detections in the bucket
    pub visual: VisualBucket,
    /// Co-occurring audio
    pub audio: AudioBucket,
    /// Classes corroborated by speech or audio events
    pub confirmed_by_audio: Vec<String>,
}

impl TimelineEntry {
    /// Whether a class was confirmed by audio in this bucket.
    pub fn is_confirmed(&self, class_name: &str) -> bool {
        self.confirmed_by_audio.iter().any(|c| c == class_name)
    }
}

/// Output of audio-visual correlation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct AudioVisualFusion {
    /// Entries in ascending bucket order
    pub timeline: Vec<TimelineEntry>,
    /// Full transcript text
    pub full_transcript: String,
    /// Number of speech segments considered
    pub total_speech_segments: usize,
    /// Number of audio events considered
    pub total_audio_events: usize,
    /// Count of (bucket, class) confirmations
    pub audio_confirmations: usize,
}

/// Audio section of the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AudioAnalysis {
    /// The video carried no audio; correlation was skipped.
    NoAudio { message: String },
    /// Audio was present and correlated with the visual detections.
    Fused {
        transcript: Transcript,
        audio_events: Vec<AudioEvent>,
        fused_data: AudioVisualFusion,
    },
}

impl AudioAnalysis {
    /// The explicit "no audio" marker.
    pub fn no_audio() -> Self {
        AudioAnalysis::NoAudio {
            message: "No audio track in video".to_string(),
        }
    }

    /// Whether audio was present.
    pub fn has_audio(&self) -> bool {
        matches!(self, AudioAnalysis::Fused { .. })
    }

    /// Fused timeline, if audio was present.
    pub fn fused(&self) -> Option<&AudioVisualFusion> {
        match self {
            AudioAnalysis::Fused { fused_data, .. } => Some(fused_data),
            AudioAnalysis::NoAudio { .. } => None,
        }
    }
}
