//! Tracing setup.
//!
//! The TUI owns stdout, so events go to `<log_dir>/dashboard.log` through a
//! non-blocking appender. Filter comes from `RUST_LOG`, falling back to
//! `DEFAULT_FILTER`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogFormat;

/// Events are logged under short targets (`client`, `poll`, ...); each one
/// is listed here.
pub const DEFAULT_FILTER: &str =
    "brand_tracker_dashboard=info,config=info,client=info,poll=info,stream=info,shell=info,logging=info,warn";
pub const LOG_FILE: &str = "dashboard.log";

/// Install the global subscriber. Keep the returned guard alive for the
/// whole run; dropping it flushes and stops the writer thread.
pub fn init(log_dir: &Path, format: LogFormat) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_ansi(false).with_writer(writer))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
    };
    installed.context("installing tracing subscriber")?;

    tracing::info!(target: "logging", dir = %log_dir.display(), ?format, "logging initialised");
    Ok(guard)
}
