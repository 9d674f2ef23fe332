//! Tile coordinate module
//!
//! Provides the grid coordinate type shared by every zoom level, bounding
//! boxes over coordinate sets, region filtering, and the coordinate↔path
//! codec used for both source discovery and output placement.

mod layout;
mod types;


pub use layout::{parse_tile_filename, TileLayout, DEFAULT_EXTENSION, MANIFEST_FILENAME};
pub use types::{AxisRange, BoundingBox, RegionBounds, TileCoord, MAX_ZOOM};

/// Inclusive test of a coordinate against per-axis `[min, max]` ranges.
#[inline]
pub fn in_bounds(coord: &TileCoord, x: &AxisRange, z: &AxisRange) -> bool {
    x.contains(coord.x) && z.contains(coord.z)
}

/// Coarsest zoom level needed to cover the map.
///
/// Computed as `-trunc(log2(max_span))`, where `max_span` is the larger of the
/// x and z spans of the level-0 bounds. Maps spanning at most one tile step
/// need no coarser levels, so the result is `0` for spans of 0 or 1.
#[inline]
pub fn min_zoom_for(bounds: &BoundingBox) -> i32 {
    let span = bounds.max_span();
    if span <= 1 {
        return MAX_ZOOM;
    }
    -(span.ilog2() as i32)
}
