//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;
use tilepyramid::config::ConfigFileError;
use tilepyramid::PyramidError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to read or write the config file
    ConfigFile(ConfigFileError),
    /// Failed to start the worker pool
    PoolStartup(PyramidError),
    /// One or more maps failed structurally
    MapsFailed(Vec<String>),
    /// Failed to read a pyramid for inspection
    Inspect { path: PathBuf, error: PyramidError },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Config(msg) if msg.contains("no maps configured") => {
                eprintln!();
                eprintln!("Add a [map.<name>] section to your config file, or run:");
                eprintln!("  tilepyramid init");
                eprintln!("to write an example configuration.");
            }
            CliError::MapsFailed(_) => {
                eprintln!();
                eprintln!("Other maps were still built. Check the log file for details.");
            }
            CliError::Inspect { .. } => {
                eprintln!();
                eprintln!("The directory must contain a tile.properties.json manifest,");
                eprintln!("which is written once a build completes.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::PoolStartup(e) => write!(f, "Failed to start worker pool: {}", e),
            CliError::MapsFailed(names) => {
                write!(f, "{} map(s) failed: {}", names.len(), names.join(", "))
            }
            CliError::Inspect { path, error } => {
                write!(f, "Failed to inspect '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::PoolStartup(e) => Some(e),
            CliError::Inspect { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}
