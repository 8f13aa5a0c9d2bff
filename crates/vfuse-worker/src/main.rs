//! VFuse worker binary: one signal bundle per run.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vfuse_worker::{metrics, VideoProcessor, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("vfuse=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting vfuse-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let prometheus = metrics::init_metrics()?;

    let processor = VideoProcessor::new(config.engine_config());
    let result = processor
        .process_file(&config.input_path, &config.output_path, config.pretty_json)
        .await;

    if config.metrics_dump {
        info!(metrics = %prometheus.render(), "Metrics snapshot");
    }

    match result {
        Ok(report) => {
            info!(
                video_id = %report.video_id,
                detections = report.summary.total_detections,
                output = %config.output_path.display(),
                "Report written"
            );
            Ok(())
        }
        Err(e) => {
            error!("Processing failed: {}", e);
            Err(e.into())
        }
    }
}
