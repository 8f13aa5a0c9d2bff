//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid signal bundle: {0}")]
    InvalidBundle(String),

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Engine error: {0}")]
    Engine(#[from] vfuse_engine::EngineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn invalid_bundle(msg: impl Into<String>) -> Self {
        Self::InvalidBundle(msg.into())
    }

    pub fn processing_failed(msg: impl Into<String>) -> Self {
        Self::ProcessingFailed(msg.into())
    }

    /// Whether the input itself is at fault, so a rerun will not help.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            WorkerError::InvalidBundle(_)
                | WorkerError::Json(_)
                | WorkerError::Engine(vfuse_engine::EngineError::NoFrames { .. })
        )
    }
}
