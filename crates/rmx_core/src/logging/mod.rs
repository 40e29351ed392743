//! Logging infrastructure for the remux organizer.
//!
//! This module provides:
//! - Application-wide `tracing` output to a rolling file (the terminal is
//!   owned by the TUI, so nothing is written to stderr)
//! - A session logger that records external tool commands and output,
//!   handed to the probe/remux wrappers instead of living in a global
//!
//! # Example
//!
//! ```no_run
//! use rmx_core::logging::{LogConfig, SessionLogger};
//!
//! let logger =
//!     SessionLogger::new("session", "/path/to/logs", LogConfig::default(), None).unwrap();
//! logger.phase("Remux");
//! logger.command("ffmpeg -i input.mkv ...");
//! logger.success("Wrote output.mkv");
//! ```

mod session_logger;
mod types;

use std::path::Path;

pub use session_logger::SessionLogger;
pub use types::{LogConfig, LogLevel, MessagePrefix, StatusCallback};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber with a daily rolling log file.
///
/// - Respects the RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Writes `rmx.<date>.log` into `logs_dir`
///
/// Keep the returned guard alive for the lifetime of the program; dropping
/// it flushes pending lines.
pub fn init_tracing_with_file(
    default_level: LogLevel,
    logs_dir: &Path,
) -> Result<WorkerGuard, InitError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("rmx")
        .filename_suffix("log")
        .build(logs_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .try_init();

    Ok(guard)
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
