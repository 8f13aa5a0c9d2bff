//! Optical-flow motion classification.

use vfuse_models::{FlowStats, MotionSample, MotionSummary};

use crate::config::SignalConfig;

/// Flags frames whose mean flow magnitude exceeds a threshold.
#[derive(Debug, Clone, Copy)]
pub struct MotionClassifier {
    threshold: f64,
}

impl Default for MotionClassifier {
    fn default() -> Self {
        Self::new(&SignalConfig::default())
    }
}

impl MotionClassifier {
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            threshold: config.significant_motion_magnitude,
        }
    }

    /// Classify one frame pair's flow magnitudes.
    pub fn classify(&self, timestamp: f64, avg_magnitude: f64, max_magnitude: f64) -> MotionSample {
        MotionSample {
            timestamp,
            avg_magnitude,
            max_magnitude,
            significant_motion: avg_magnitude > self.threshold,
        }
    }

    pub fn classify_stats(&self, stats: &FlowStats) -> MotionSample {
        self.classify(stats.timestamp, stats.avg_magnitude, stats.max_magnitude)
    }
}

/// Count sampled frames and those flagged as significant motion.
pub fn summarize_motion(samples: &[MotionSample]) -> MotionSummary {
    MotionSummary {
        total_frames: samples.len(),
        frames_with_motion: samples.iter().filter(|s| s.significant_motion).count(),
    }
}
