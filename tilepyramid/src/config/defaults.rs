//! Default values and constants for all configuration settings.

use super::settings::*;
use crate::coord::{AxisRange, DEFAULT_EXTENSION};
use crate::imaging::{CompressionKind, DEFAULT_POSTERIZE_BITS};
use crate::logging::{default_log_dir, default_log_file};
use crate::pyramid::FrontierPolicy;
use std::path::PathBuf;

/// Section prefix for map sections (`[map.<name>]`).
pub const MAP_SECTION_PREFIX: &str = "map.";

/// Get the number of available CPU cores.
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Default log file: `~/.tilepyramid/logs/tilepyramid.log`.
pub fn default_log_path() -> PathBuf {
    default_log_dir().join(default_log_file())
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            threads: num_cpus(),
            compression: CompressionKind::default(),
            posterize_bits: DEFAULT_POSTERIZE_BITS,
            extension: DEFAULT_EXTENSION.to_string(),
            frontier: FrontierPolicy::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_path(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            build: BuildSettings::default(),
            logging: LoggingSettings::default(),
            maps: Vec::new(),
        }
    }
}

impl ConfigFile {
    /// Configuration written by `tilepyramid init`: defaults plus one map.
    pub fn example() -> Self {
        Self {
            maps: vec![MapSettings {
                name: "overworld".to_string(),
                dimension: "overworld".to_string(),
                source_dir: super::parser::expand_tilde("~/tiles/overworld"),
                output_dir: super::parser::expand_tilde("~/maps/overworld"),
                bounds_x: AxisRange::unbounded(),
                bounds_z: AxisRange::unbounded(),
            }],
            ..Self::default()
        }
    }
}
