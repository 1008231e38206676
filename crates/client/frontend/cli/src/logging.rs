//! File logging for the terminal client.
//!
//! The terminal owns stdout and stderr while the UI runs, so all tracing
//! output goes to a daily rolling file instead.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "arcane-client.log";

/// Platform log directory, e.g. `~/.local/share/arcane-client/logs` on Linux.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "arcane-client")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("arcane-client"))
        .join("logs")
}

/// Creates the log directory, preferring `override_dir` when given.
pub fn prepare_log_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = override_dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    Ok(dir)
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// whole process or buffered lines are lost on exit.
pub fn setup_logging(override_dir: Option<&Path>) -> Result<WorkerGuard> {
    let log_dir = prepare_log_dir(override_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}
