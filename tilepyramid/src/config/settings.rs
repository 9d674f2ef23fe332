//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use crate::coord::{AxisRange, RegionBounds};
use crate::imaging::CompressionKind;
use crate::pyramid::{FrontierPolicy, MapRequest};
use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Build settings shared by every map
    pub build: BuildSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Maps to build, in file order
    pub maps: Vec<MapSettings>,
}

/// `[build]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Worker pool size
    pub threads: usize,
    /// Post-processing applied to every written tile
    pub compression: CompressionKind,
    /// Significant bits kept per colour channel by posterize compression
    pub posterize_bits: u8,
    /// Tile file extension
    pub extension: String,
    /// Which level-0 tiles seed the coarser levels
    pub frontier: FrontierPolicy,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Session log file
    pub file: PathBuf,
}

/// One `[map.<name>]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSettings {
    pub name: String,
    pub dimension: String,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub bounds_x: AxisRange,
    pub bounds_z: AxisRange,
}

impl MapSettings {
    /// Build request for this map.
    pub fn to_request(&self) -> MapRequest {
        MapRequest::new(
            &self.name,
            &self.dimension,
            &self.source_dir,
            &self.output_dir,
        )
        .with_bounds(RegionBounds::new(self.bounds_x, self.bounds_z))
    }
}

impl ConfigFile {
    /// Look up a map by name.
    pub fn map(&self, name: &str) -> Option<&MapSettings> {
        self.maps.iter().find(|m| m.name == name)
    }
}
