//! Logging setup
//!
//! The terminal UI owns stdout, so log records go to `widgetdash.log` in the
//! data directory through a non-blocking file writer.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Name of the log file inside the data directory
pub const LOG_FILE_NAME: &str = "widgetdash.log";

/// Builds the level filter. Without `debug` the level is pinned to `info`
/// regardless of `RUST_LOG`; with `debug`, `RUST_LOG` may override it.
pub fn filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    }
}

/// Initialise logging into `dir`. Keep the returned guard alive for as long
/// as records should be flushed.
pub fn init(dir: &Path, debug: bool) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}
