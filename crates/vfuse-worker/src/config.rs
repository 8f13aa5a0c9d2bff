//! Worker configuration.

use std::path::PathBuf;

use vfuse_engine::EngineConfig;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Signal bundle to read
    pub input_path: PathBuf,
    /// Where the report JSON is written
    pub output_path: PathBuf,
    /// Pretty-print the report
    pub pretty_json: bool,
    /// Log the Prometheus exposition after the run
    pub metrics_dump: bool,
    /// Override for the false-positive area floor
    pub min_area: Option<f64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("signals.json"),
            output_path: PathBuf::from("report.json"),
            pretty_json: false,
            metrics_dump: false,
            min_area: None,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            input_path: std::env::var("WORKER_INPUT")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.input_path),
            output_path: std::env::var("WORKER_OUTPUT")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            pretty_json: std::env::var("WORKER_PRETTY_JSON")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.pretty_json),
            metrics_dump: std::env::var("WORKER_METRICS_DUMP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.metrics_dump),
            min_area: std::env::var("WORKER_MIN_AREA")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Engine configuration with this worker's overrides applied.
    pub fn engine_config(&self) -> EngineConfig {
        match self.min_area {
            Some(min_area) => EngineConfig::default().with_min_area(min_area),
            None => EngineConfig::default(),
        }
    }
}
