//! Prometheus metrics for the worker.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const BUNDLES_PROCESSED_TOTAL: &str = "vfuse_worker_bundles_processed_total";
    pub const BUNDLE_FAILURES_TOTAL: &str = "vfuse_worker_bundle_failures_total";
    pub const BUNDLE_DURATION_SECONDS: &str = "vfuse_worker_bundle_duration_seconds";
}

pub fn record_bundle_processed(duration_secs: f64) {
    counter!(names::BUNDLES_PROCESSED_TOTAL).increment(1);
    histogram!(names::BUNDLE_DURATION_SECONDS).record(duration_secs);
}

pub fn record_bundle_failure() {
    counter!(names::BUNDLE_FAILURES_TOTAL).increment(1);
}
