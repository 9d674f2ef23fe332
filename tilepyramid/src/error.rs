//! Error types for pyramid construction.
//!
//! A single error enum covers the whole build: structural failures that
//! abort a map before any job is submitted (`Config`, `SourceMissing`,
//! `EmptyInput`) and per-job failures reported by the worker pool
//! (`Decode`, `Encode`, `Io`, `Worker`).

use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while building a tile pyramid.
#[derive(Debug, Error)]
pub enum PyramidError {
    /// Bounds were requested for an empty coordinate set.
    #[error("Cannot compute bounds of an empty coordinate set")]
    EmptyInput,

    /// An image could not be decoded.
    #[error("Failed to decode {input}: {reason}")]
    Decode { input: String, reason: String },

    /// An image could not be encoded.
    #[error("Failed to encode tile: {0}")]
    Encode(String),

    /// A filesystem read or write failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// A map build request is malformed.
    #[error("Invalid build request: {0}")]
    Config(String),

    /// The source tile directory does not exist.
    #[error("Source tile directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// A worker thread failed outside normal job error handling.
    #[error("Worker failure: {0}")]
    Worker(String),
}

impl PyramidError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        PyramidError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a decode error for a file on disk.
    pub fn decode(path: impl AsRef<Path>, reason: impl Display) -> Self {
        PyramidError::Decode {
            input: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a decode error for an in-memory buffer.
    pub fn decode_buffer(reason: impl Display) -> Self {
        PyramidError::Decode {
            input: "<buffer>".to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error should abort the whole map build.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PyramidError::EmptyInput | PyramidError::Config(_) | PyramidError::SourceMissing(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type PyramidResult<T> = Result<T, PyramidError>;
