//! Binary entry: parse arguments, configure logging, run the pipeline

use crate::app::cli::Args;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::{close_on_shutdown, ShutdownCoordinator};
use crate::core::version;
use crate::timer::{Pipeline, PipelineError, PipelineResult, RunReport, Task};
use clap::Parser;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const EXIT_OK: i32 = 0;
pub const EXIT_CONFIG: i32 = 1;
pub const EXIT_FAILURE: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 130;

/// Run the application and return the process exit code
pub fn startup() -> i32 {
    let mut args = Args::parse();

    // Logging is configured from the merged settings, so config errors go to stderr
    let config_path = match args.load_config_file() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };

    let use_color = args.use_color();
    colored::control::set_override(use_color);
    if let Err(e) = init_logging(
        Some(args.effective_log_level()),
        args.log_format.as_deref(),
        args.log_file_path(),
        use_color,
    ) {
        eprintln!("Warning: could not initialise logging: {}", e);
    }

    log::info!("pcqueue {} starting", version::long_version());
    if let Some(path) = config_path {
        log::debug!("Loaded configuration from {}", path.display());
    }

    let pipeline = match Pipeline::new(args.pipeline_config()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log_error_with_context(&e, "Configuring pipeline");
            return exit_code_for(&e);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("FATAL: could not start signal runtime: {}", e);
            return EXIT_FAILURE;
        }
    };

    let latency = Arc::new(LatencyStats::default());
    match runtime.block_on(run_guarded(pipeline, Arc::clone(&latency))) {
        Ok((report, interrupted)) => {
            log_summary(&report, &latency);
            if interrupted {
                log::warn!("Interrupted by signal");
                EXIT_INTERRUPTED
            } else {
                EXIT_OK
            }
        }
        Err(e) => {
            log_error_with_context(&e, "Running pipeline");
            exit_code_for(&e)
        }
    }
}

/// Run the pipeline on the blocking pool while signal handlers watch for shutdown
async fn run_guarded(
    pipeline: Pipeline,
    latency: Arc<LatencyStats>,
) -> PipelineResult<(RunReport, bool)> {
    ShutdownCoordinator::guard_with_coordinator(|coordinator, shutdown_rx| async move {
        let watcher = tokio::spawn(close_on_shutdown(pipeline.queue(), shutdown_rx));

        let outcome = tokio::task::spawn_blocking(move || {
            pipeline.run_with(move |_, task: Task| latency.record(task.age()))
        })
        .await;
        watcher.abort();

        let report = outcome.map_err(|_| PipelineError::WorkerPanicked {
            role: "pipeline".to_string(),
        })??;
        Ok((report, coordinator.is_shutdown_requested()))
    })
    .await
}

pub fn exit_code_for(error: &PipelineError) -> i32 {
    match error {
        PipelineError::Config(_) => EXIT_CONFIG,
        _ => EXIT_FAILURE,
    }
}

/// Time from task creation to handling, accumulated across consumers
#[derive(Debug, Default)]
pub struct LatencyStats {
    count: AtomicU64,
    total_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

impl LatencyStats {
    pub fn record(&self, latency: Duration) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> Duration {
        match self.count() {
            0 => Duration::ZERO,
            count => Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed) / count),
        }
    }

    pub fn max(&self) -> Duration {
        Duration::from_nanos(self.max_nanos.load(Ordering::Relaxed))
    }
}

fn log_summary(report: &RunReport, latency: &LatencyStats) {
    log::info!(
        "Produced {} and consumed {} item(s) in {:.2?}",
        report.produced,
        report.consumed,
        report.elapsed
    );
    log::info!(
        "Queue: capacity {}, high water mark {}; latency mean {:.2?}, max {:.2?}",
        report.stats.capacity,
        report.stats.high_water_mark,
        latency.mean(),
        latency.max()
    );
    for (worker, processed) in report.per_consumer.iter().enumerate() {
        log::debug!("consumer-{}: {} item(s)", worker, processed);
    }
    match serde_json::to_string(report) {
        Ok(json) => log::debug!("Run report: {}", json),
        Err(e) => log::debug!("Run report not serialisable: {}", e),
    }
}
