//! Speech transcript and audio event models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{validate_confidence, validate_timestamp, ModelError};

/// A speech utterance window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudioSegment {
    /// Start time in seconds (inclusive)
    pub start: f64,
    /// End time in seconds (exclusive)
    pub end: f64,
    /// Transcribed text
    pub text: String,
    /// Transcription confidence (0.0-1.0)
    pub confidence: f64,
}

impl AudioSegment {
    /// Create a new speech segment.
    pub fn new(start: f64, end: f64, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            confidence,
        }
    }

    /// Whether the half-open window `[start, end)` contains `time`.
    pub fn covers(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }

    /// Check ordering, finiteness and confidence range.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.start.is_finite() || !self.end.is_finite() || self.start >= self.end {
            return Err(ModelError::InvalidSegment {
                start: self.start,
                end: self.end,
            });
        }
        validate_confidence(self.confidence)
    }
}

/// Kind of non-speech sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AudioEventType {
    /// Loud, sharp sound (impact, alarm)
    LoudEvent,
    /// Loud continuous sound
    LoudSound,
    /// Medium-volume low-frequency sound (engine, rumble)
    LowFrequency,
    /// Medium-volume high-frequency sound (beep)
    HighFrequency,
}

impl AudioEventType {
    /// Returns the event type as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEventType::LoudEvent => "loud_event",
            AudioEventType::LoudSound => "loud_sound",
            AudioEventType::LowFrequency => "low_frequency",
            AudioEventType::HighFrequency => "high_frequency",
        }
    }
}

impl fmt::Display for AudioEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discrete non-speech sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudioEvent {
    /// Event time in seconds
    pub timestamp: f64,
    /// Event classification
    pub event_type: AudioEventType,
    /// Classification confidence (0.0-1.0)
    pub confidence: f64,
    /// Human-readable description
    pub description: String,
    /// RMS energy of the window
    pub energy: f64,
}

impl AudioEvent {
    /// Create a new audio event.
    pub fn new(
        timestamp: f64,
        event_type: AudioEventType,
        confidence: f64,
        description: impl Into<String>,
        energy: f64,
    ) -> Self {
        Self {
            timestamp,
            event_type,
            confidence,
            description: description.into(),
            energy,
        }
    }

    /// Check timestamp, confidence and energy.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_timestamp(self.timestamp)?;
        validate_confidence(self.confidence)?;
        if self.energy.is_finite() && self.energy >= 0.0 {
            Ok(())
        } else {
            Err(ModelError::InvalidEnergy(self.energy))
        }
    }
}

/// Speech transcript for a whole video.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    /// Concatenated transcript text
    #[serde(default)]
    pub full_text: String,
    /// Detected language code
    #[serde(default = "default_language")]
    pub language: String,
    /// Ordered speech segments
    #[serde(default)]
    pub segments: Vec<AudioSegment>,
}

fn default_language() -> String {
    "unknown".to_string()
}

impl Transcript {
    /// Build a transcript from segments, joining their text.
    pub fn from_segments(language: impl Into<String>, segments: Vec<AudioSegment>) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            full_text,
            language: language.into(),
            segments,
        }
    }
}

/// Audio signal for a video.
///
/// A silent video is `Unavailable`, which is distinct from an available
/// track that produced no segments or events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AudioInput {
    /// No audio track
    #[default]
    Unavailable,
    /// Audio track present
    Available {
        transcript: Transcript,
        events: Vec<AudioEvent>,
    },
}

impl AudioInput {
    /// Build from optional parts. Audio is unavailable only when both are absent.
    pub fn from_parts(transcript: Option<Transcript>, events: Option<Vec<AudioEvent>>) -> Self {
        match (transcript, events) {
            (None, None) => AudioInput::Unavailable,
            (transcript, events) => AudioInput::Available {
                transcript: transcript.unwrap_or_default(),
                events: events.unwrap_or_default(),
            },
        }
    }

    /// Whether an audio track is present.
    pub fn is_available(&self) -> bool {
        matches!(self, AudioInput::Available { .. })
    }
}
