//! Logging abstraction layer.
//!
//! Pyramid components log through the [`Logger`] trait instead of calling
//! `tracing` directly, so the builder and worker pool can run silently in
//! tests or have their messages captured and asserted on.
//!
//! - [`TracingLogger`]: production adapter that forwards to `tracing`
//! - [`NoOpLogger`]: discards everything
//! - [`MemoryLogger`]: records messages in memory
//!
//! ```
//! use tilepyramid::log::{Logger, MemoryLogger};
//! use tilepyramid::log_info;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(MemoryLogger::new());
//! log_info!(logger, "overworld, z.0: {} tiles", 12);
//! assert!(logger.contains("12 tiles"));
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::MemoryLogger;
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
