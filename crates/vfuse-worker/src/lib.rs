//! Batch worker for the VFuse engine.
//!
//! Loads a recorded signal bundle, replays each detector through the
//! adapter trait, classifies raw auxiliary signals, runs the engine and
//! writes the serialized report.

pub mod bundle;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod processor;

pub use bundle::{DetectorRecording, RecordedFrame, SignalBundle};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::VideoLogger;
pub use processor::VideoProcessor;
