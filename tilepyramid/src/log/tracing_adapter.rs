//! Tracing library adapter implementation.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger implementation that delegates to the `tracing` crate.
///
/// Messages land in whatever subscriber the binary installed; see
/// [`crate::logging::init_logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "tilepyramid", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "tilepyramid", "{}", args),
            LogLevel::Info => tracing::info!(target: "tilepyramid", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "tilepyramid", "{}", args),
            LogLevel::Error => tracing::error!(target: "tilepyramid", "{}", args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingLogger>();
    }

    #[test]
    fn test_tracing_logger_without_subscriber() {
        // No subscriber installed: events are dropped, never panic
        let logger: Box<dyn Logger> = Box::new(TracingLogger::new());
        logger.info(format_args!("z.-1: 0,0"));
        logger.error(format_args!("problem on tile {}", "1,0"));
    }
}
