//! # Logging Setup
//!
//! Tracing subscriber wiring for embedding processes: env-filtered stdout
//! output plus an optional non-blocking file sink.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initializes the global subscriber. Returns the file writer guard when a
/// log directory is given; keep it alive for the process lifetime so
/// buffered lines are flushed.
pub fn init(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let stdout_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, "session.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .init();
            None
        }
    }
}
