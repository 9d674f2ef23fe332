//! tilepyramid - Multi-resolution tile pyramids for map viewers
//!
//! This library turns a flat directory of `r.<x>.<z>.<ext>` tiles into a
//! zoomable pyramid: level 0 holds the original tiles, and each coarser level
//! composites 2×2 tiles of the level below into one, halving resolution.
//!
//! # High-Level API
//!
//! ```ignore
//! use tilepyramid::pool::{PoolConfig, WorkerPool};
//! use tilepyramid::pyramid::{MapRequest, PyramidBuilder};
//!
//! let pool = WorkerPool::new(PoolConfig::default(), ops, compressor, logger.clone())?;
//! let summary = PyramidBuilder::new(&pool, logger)
//!     .build(&MapRequest::new("world", "overworld", "tiles/world", "maps/world"))?;
//! ```
//!
//! Builds are incremental. Re-running on an unchanged source directory writes
//! no tiles; touching one source tile regenerates it and its ancestors only.

pub mod change;
pub mod config;
pub mod coord;
pub mod error;
pub mod imaging;
pub mod log;
pub mod logging;
pub mod manifest;
pub mod pool;
pub mod pyramid;
pub mod storage;

pub use error::{PyramidError, PyramidResult};

/// Version of the tilepyramid library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
        assert_eq!(VERSION.split('.').count(), 3);
    }
}
