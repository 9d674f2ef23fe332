//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::fmt::Write;
use std::path::Path;

use super::defaults::MAP_SECTION_PREFIX;
use super::settings::{ConfigFile, MapSettings};
use crate::coord::AxisRange;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let mut out = format!(
        r#"[build]
; Number of worker threads (default: number of CPU cores)
threads = {}
; Post-processing applied to every written tile:
;   none      - write tiles exactly as produced
;   posterize - reduce colour depth and recompress (smaller files, lossy)
compression = {}
; Significant bits kept per colour channel when compression = posterize (1-8)
posterize_bits = {}
; File extension of source and output tiles (only png is supported)
extension = {}
; Which level-0 tiles seed the coarser zoom levels:
;   changed - only tiles written in this run (incremental, default)
;   full    - every discovered tile (rebuilds all coarser levels)
frontier = {}

[logging]
; Session log file, cleared at the start of every run
file = {}
"#,
        config.build.threads,
        config.build.compression,
        config.build.posterize_bits,
        config.build.extension,
        config.build.frontier,
        path_to_string(&config.logging.file),
    );

    if config.maps.is_empty() {
        out.push_str(
            r#"
; Add one section per map:
;
; [map.overworld]
; dimension = overworld
; source_dir = ~/tiles/overworld
; output_dir = ~/maps/overworld
"#,
        );
    }

    for map in &config.maps {
        write_map(&mut out, map);
    }
    out
}

fn write_map(out: &mut String, map: &MapSettings) {
    // Writing into a String cannot fail
    let _ = write!(
        out,
        r#"
[{}{}]
; Label written to the manifest (defaults to the map name)
dimension = {}
; Directory holding r.<x>.<z>.<ext> tiles from the renderer
source_dir = {}
; Pyramid root: receives z.<zoom>/ directories and tile.properties.json
output_dir = {}
; Optional inclusive tile ranges, written as: min, max
"#,
        MAP_SECTION_PREFIX,
        map.name,
        map.dimension,
        path_to_string(&map.source_dir),
        path_to_string(&map.output_dir),
    );
    write_range(out, "bounds_x", &map.bounds_x);
    write_range(out, "bounds_z", &map.bounds_z);
}

fn write_range(out: &mut String, key: &str, range: &AxisRange) {
    let _ = if *range == AxisRange::unbounded() {
        writeln!(out, "; {} = -100, 100", key)
    } else {
        writeln!(out, "{} = {}, {}", key, range.min, range.max)
    };
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
