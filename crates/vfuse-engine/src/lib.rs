//! Fusion and consistency engine for video perception signals.
//!
//! This crate provides:
//! - Multi-detector ensemble fusion with agreement-based clustering
//! - Rule-based false-positive rejection
//! - Clip-level temporal consistency over externally assigned tracks
//! - Audio-visual correlation on a one-second timeline
//! - Report assembly into a single immutable `VideoReport`
//! - Detector adapters and supplementary motion, pose and audio-event classifiers

pub mod assembler;
pub mod audio_events;
pub mod config;
pub mod correlator;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod false_positive;
pub mod geometry;
pub mod lexicon;
pub mod metrics;
pub mod motion;
pub mod pose;
pub mod provider;
pub mod temporal;


pub use assembler::{dominant_objects, AssemblyParts, TimelineAssembler};
pub use audio_events::AudioEventClassifier;
pub use config::{
    CorrelationConfig, EngineConfig, FalsePositiveConfig, FusionConfig, SignalConfig,
    TemporalFilterConfig,
};
pub use correlator::AudioVisualCorrelator;
pub use engine::FusionEngine;
pub use ensemble::{EnsembleFuser, FusedFrame};
pub use error::{EngineError, EngineResult};
pub use false_positive::{FalsePositiveFilter, Rejection};
pub use geometry::{average, iou};
pub use motion::{summarize_motion, MotionClassifier};
pub use pose::PoseGate;
pub use provider::{collect_frame_signal, DetectorProvider, ReplayDetector};
pub use temporal::{TemporalConsistencyFilter, TemporalOutcome};
