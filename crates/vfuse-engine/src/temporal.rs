//! Clip-level temporal consistency filtering.
//!
//! Runs once over every detection of a clip, after all frames are in:
//! - tracked detections are kept or dropped per track, as a whole;
//! - untracked detections are kept individually above a stricter
//!   confidence floor, since nothing corroborates them across frames.

use std::collections::HashMap;

use tracing::debug;
use vfuse_models::{Detection, TrackId};

use crate::config::TemporalFilterConfig;

/// Outcome of temporal filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemporalOutcome {
    /// Kept detections, in their original order
    pub kept: Vec<Detection>,
    /// Tracks kept in full
    pub tracks_kept: usize,
    /// Tracks dropped in full
    pub tracks_dropped: usize,
    /// Untracked detections kept
    pub untracked_kept: usize,
    /// Untracked detections dropped
    pub untracked_dropped: usize,
}

impl TemporalOutcome {
    /// Total detections dropped.
    pub fn dropped(&self, input_len: usize) -> usize {
        input_len.saturating_sub(self.kept.len())
    }
}

/// Validates detections against their track history.
#[derive(Debug, Clone, Default)]
pub struct TemporalConsistencyFilter {
    config: TemporalFilterConfig,
}

impl TemporalConsistencyFilter {
    /// Create a filter with the given configuration.
    pub fn new(config: TemporalFilterConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TemporalFilterConfig::default())
    }

    /// Filter a whole clip's detections.
    pub fn apply(&self, detections: Vec<Detection>) -> TemporalOutcome {
        let mut track_lengths: HashMap<TrackId, usize> = HashMap::new();
        for detection in &detections {
            if let Some(track_id) = detection.track_id {
                *track_lengths.entry(track_id).or_insert(0) += 1;
            }
        }

        let mut outcome = TemporalOutcome {
            tracks_kept: track_lengths
                .values()
                .filter(|&&len| len >= self.config.min_track_length)
                .count(),
            ..Default::default()
        };
        outcome.tracks_dropped = track_lengths.len() - outcome.tracks_kept;

        for detection in detections {
            let keep = match detection.track_id {
                Some(track_id) => {
                    track_lengths.get(&track_id).copied().unwrap_or(0)
                        >= self.config.min_track_length
                }
                None => {
                    let keep = detection.confidence >= self.config.untracked_min_confidence;
                    if keep {
                        outcome.untracked_kept += 1;
                    } else {
                        outcome.untracked_dropped += 1;
                    }
                    keep
                }
            };
            if keep {
                outcome.kept.push(detection);
            }
        }

        debug!(
            tracks_kept = outcome.tracks_kept,
            tracks_dropped = outcome.tracks_dropped,
            untracked_kept = outcome.untracked_kept,
            untracked_dropped = outcome.untracked_dropped,
            "Temporal filter applied"
        );

        outcome
    }
}
