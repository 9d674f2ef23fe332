//! Logging infrastructure for tilepyramid binaries.
//!
//! Installs a global `tracing` subscriber with two outputs:
//! - a log file, cleared at the start of every session
//! - stdout, for following a build from the terminal
//!
//! The filter defaults to `info` and can be overridden with `RUST_LOG`;
//! debug mode forces `debug` for this crate regardless of the environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
    log_path: PathBuf,
}

impl LoggingGuard {
    /// Path of the session log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

/// Options for [`init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Mirror log lines to stdout
    pub stdout: bool,
    /// Force debug level for tilepyramid targets
    pub debug: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            stdout: true,
            debug: false,
        }
    }
}

/// Initialize the global logging subscriber.
///
/// Creates `log_dir` if needed and truncates `log_file` so each session
/// starts with an empty log.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cleared.
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    options: &LoggingOptions,
) -> Result<LoggingGuard, io::Error> {
    let log_path = prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(false);

    let stdout_layer = options.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(build_filter(options.debug))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_path,
    })
}

/// Create the log directory and clear any previous session log.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

fn build_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("info,tilepyramid=debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Default log directory: `~/.tilepyramid/logs`.
pub fn default_log_dir() -> PathBuf {
    crate::config::config_directory().join("logs")
}

/// Default log file name.
pub fn default_log_file() -> &'static str {
    "tilepyramid.log"
}
