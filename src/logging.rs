use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "rec-distance.log";

/// Sends tracing output to a daily rolling file in `dir`.
///
/// Stdout is left to the command-line output. The returned guard flushes the
/// background writer when dropped, so hold it for the life of the process.
pub fn initialize_logging(dir: impl AsRef<Path>) -> WorkerGuard {
    let dir = dir.as_ref();
    let _ = std::fs::create_dir_all(dir);

    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    tracing::info!("Logging to {}", dir.display());
    guard
}
