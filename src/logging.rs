//! Logging setup for athon-fmt.
//!
//! Human-readable logs always go to stderr, since stdout carries formatted
//! text. When enabled in config, structured JSON is also appended to
//! ~/.athon/logs/athon-fmt.jsonl.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{PathsConfig, PluginConfig};

/// Returns the path to the JSONL log file.
pub fn log_file_path(paths: &PathsConfig) -> PathBuf {
    paths.logs_dir().join("athon-fmt.jsonl")
}

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Initialize logging.
/// Returns a guard that must be held for the duration of the program when
/// file logging is on.
pub fn init_logging(config: &PluginConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let (file_layer, guard) = if config.logging.file {
        let log_dir = config.paths.logs_dir();
        fs::create_dir_all(&log_dir).context("Failed to create logs directory")?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path(&config.paths))
            .context("Failed to open log file")?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = fmt::layer()
            .json()
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_writer(non_blocking);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
        )
        .init();

    Ok(guard)
}
