//! Log setup for the terminal host.
//!
//! The terminal belongs to the animation, so logs go to a file:
//! `$BARRIER_BARS_LOG_DIR/barrier-bars.log` (defaulting to the system temp
//! directory). Verbosity comes from `BARRIER_BARS_LOG` and defaults to `warn`.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "BARRIER_BARS_LOG";
pub const LOG_DIR_ENV: &str = "BARRIER_BARS_LOG_DIR";
pub const LOG_FILE: &str = "barrier-bars.log";

pub fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

/// Install the global subscriber. Keep the returned guard alive for as long
/// as logs should be flushed.
pub fn init() -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::never(log_dir(), LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(guard)
}
