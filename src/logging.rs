use std::{fs, path::Path};

use crate::error::LoggingError;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Keeps the log writer flushing until dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Sends tracing output to a daily log file in `log_dir`. The terminal is
/// owned by the UI, so nothing is ever written to stdout or stderr.
pub fn init_logging(log_dir: &Path, default_level: &str) -> Result<LoggingGuard, LoggingError> {
    if !log_dir.is_dir() {
        fs::create_dir_all(log_dir)?;
    }

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("tasks.log")
        .build(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true),
    );

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        tracing::debug!(%err, "a tracing subscriber is already installed");
    }

    tracing::info!("Logging initialized at {:?}", log_dir);

    Ok(LoggingGuard { _guard: guard })
}
