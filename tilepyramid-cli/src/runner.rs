//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and worker pool
//! creation so command handlers stay small.

use crate::error::CliError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tilepyramid::config::{config_file_path, ConfigFile};
use tilepyramid::imaging::ImageCrateOps;
use tilepyramid::log::{Logger, TracingLogger};
use tilepyramid::logging::{default_log_file, init_logging, LoggingGuard, LoggingOptions};
use tilepyramid::pool::{PoolConfig, WorkerPool};
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    logger: Arc<dyn Logger>,
}

impl CliRunner {
    /// Load the config file and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to load instead of `~/.tilepyramid/config.ini`
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn new(config_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(config_file_path);
        let config = ConfigFile::load_from(&path)?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(
            &log_dir,
            &log_file,
            &LoggingOptions {
                stdout: true,
                debug: debug_mode,
            },
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        info!("Using config file {}", path.display());

        Ok(Self {
            logging_guard,
            config,
            logger: Arc::new(TracingLogger),
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Library logger that forwards to `tracing`.
    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.logger)
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("tilepyramid v{}", tilepyramid::VERSION);
        info!("tilepyramid CLI: {} command", command);
        info!("Logging to {}", self.logging_guard.log_path().display());
    }

    /// Create the worker pool from `[build]` settings.
    ///
    /// `threads` overrides the configured pool size.
    pub fn create_pool(&self, threads: Option<usize>) -> Result<WorkerPool, CliError> {
        let build = &self.config.build;
        let compressor = build
            .compression
            .build(build.posterize_bits)
            .map_err(CliError::PoolStartup)?;
        let pool_config = PoolConfig::default().with_threads(threads.unwrap_or(build.threads));

        WorkerPool::new(
            pool_config,
            Arc::new(ImageCrateOps::new()),
            compressor,
            self.logger(),
        )
        .map_err(CliError::PoolStartup)
    }
}

/// Split the configured log file into directory and file name.
fn split_log_path(path: &Path) -> (PathBuf, String) {
    let log_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let log_file = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| default_log_file().to_string());
    (log_dir, log_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path(Path::new("/var/log/pyramid.log")),
            (PathBuf::from("/var/log"), "pyramid.log".to_string())
        );
        assert_eq!(
            split_log_path(Path::new("pyramid.log")),
            (PathBuf::from("."), "pyramid.log".to_string())
        );
        assert_eq!(
            split_log_path(Path::new("/")),
            (PathBuf::from("."), "tilepyramid.log".to_string())
        );
    }
}
