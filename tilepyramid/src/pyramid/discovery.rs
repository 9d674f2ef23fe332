//! Base tile discovery.

use crate::change::BaseTile;
use crate::coord::{RegionBounds, TileLayout};
use crate::error::{PyramidError, PyramidResult};
use std::fs;

/// List the base tiles in `source`, classified against their level-0 outputs.
///
/// Entries whose names do not decode as tile files with the layout's
/// extension are skipped, as are non-canonical spellings such as
/// `r.00.0.png` and tiles outside `bounds`. Each coordinate therefore
/// appears at most once. The result is
/// sorted by coordinate.
///
/// # Errors
///
/// Returns `PyramidError::SourceMissing` if the directory does not exist and
/// `PyramidError::Io` if it cannot be listed.
pub fn discover_base_tiles(
    source: &TileLayout,
    output: &TileLayout,
    bounds: &RegionBounds,
) -> PyramidResult<Vec<BaseTile>> {
    let dir = source.root();
    if !dir.is_dir() {
        return Err(PyramidError::SourceMissing(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|e| PyramidError::io(dir, e))?;
    let mut tiles = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PyramidError::io(dir, e))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(coord) = source.parse(name) else {
            continue;
        };
        if !bounds.contains(&coord) {
            continue;
        }
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        tiles.push(BaseTile::discover(
            coord,
            entry.path(),
            output.tile_path(0, &coord),
        ));
    }

    tiles.sort_by_key(|tile| tile.coord);
    Ok(tiles)
}
