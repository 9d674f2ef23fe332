//! Pyramid construction for a single map.
//!
//! Level 0 holds the renderer's tiles (recompressed). Every coarser level
//! halves resolution: the tile at `(x, z)` on level `n` is the 2×2 block
//! `(2x..2x+1, 2z..2z+1)` of level `n + 1`, downsampled. Builds are
//! incremental; only tiles whose source changed, and their ancestors, are
//! regenerated.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tilepyramid::imaging::{ImageCrateOps, PassthroughCompressor};
//! use tilepyramid::log::TracingLogger;
//! use tilepyramid::pool::{PoolConfig, WorkerPool};
//! use tilepyramid::pyramid::{MapRequest, PyramidBuilder};
//!
//! let logger = Arc::new(TracingLogger);
//! let pool = WorkerPool::new(
//!     PoolConfig::default(),
//!     Arc::new(ImageCrateOps::new()),
//!     Arc::new(PassthroughCompressor),
//!     logger.clone(),
//! )?;
//!
//! let request = MapRequest::new("world", "overworld", "tiles/world", "maps/world");
//! let summary = PyramidBuilder::new(&pool, logger).build(&request)?;
//! println!("{} tiles written", summary.tiles_written());
//! # Ok::<(), tilepyramid::PyramidError>(())
//! ```

mod builder;
mod discovery;
mod progress;
mod request;

pub use builder::{
    BuildOptions, BuildSummary, FrontierPolicy, LevelSummary, PyramidBuilder,
};
pub use discovery::discover_base_tiles;
pub use progress::{BuildPhase, BuildProgress, BuildProgressCallback};
pub use request::MapRequest;
