//! Coordinate type definitions

use crate::error::{PyramidError, PyramidResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Finest zoom level; holds the source tiles.
pub const MAX_ZOOM: i32 = 0;

/// Grid position of a tile within one zoom level.
///
/// Coordinates are signed: maps may extend in every direction from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// East-west grid position
    pub x: i32,
    /// North-south grid position
    pub z: i32,
}

impl TileCoord {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the coordinate of the tile one level coarser that contains this one.
    ///
    /// Halving floors toward negative infinity so that `-1` and `-2` share the
    /// parent `-1`, keeping quadrant grouping symmetric across the origin.
    #[inline]
    pub fn parent(&self) -> TileCoord {
        TileCoord {
            x: self.x.div_euclid(2),
            z: self.z.div_euclid(2),
        }
    }

    /// Returns the four child coordinates one level finer, in row-major order:
    /// `(0,0)`, `(1,0)`, `(0,1)`, `(1,1)` offsets from the even-aligned anchor.
    ///
    /// The array index doubles as the quadrant index used when compositing
    /// (0 top-left, 1 top-right, 2 bottom-left, 3 bottom-right).
    #[inline]
    pub fn children(&self) -> [TileCoord; 4] {
        let x = self.x * 2;
        let z = self.z * 2;
        [
            TileCoord::new(x, z),
            TileCoord::new(x + 1, z),
            TileCoord::new(x, z + 1),
            TileCoord::new(x + 1, z + 1),
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

/// Componentwise extent of a non-empty set of tile coordinates.
///
/// Serialized with the field names the map viewer expects
/// (`minX`, `maxX`, `minZ`, `maxZ`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl BoundingBox {
    /// Computes the bounding box of a coordinate set.
    ///
    /// # Errors
    ///
    /// Returns [`PyramidError::EmptyInput`] if `coords` yields nothing.
    pub fn from_coords<I>(coords: I) -> PyramidResult<Self>
    where
        I: IntoIterator<Item = TileCoord>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next().ok_or(PyramidError::EmptyInput)?;

        let mut bounds = BoundingBox {
            min_x: first.x,
            max_x: first.x,
            min_z: first.z,
            max_z: first.z,
        };
        for coord in iter {
            bounds.min_x = bounds.min_x.min(coord.x);
            bounds.max_x = bounds.max_x.max(coord.x);
            bounds.min_z = bounds.min_z.min(coord.z);
            bounds.max_z = bounds.max_z.max(coord.z);
        }
        Ok(bounds)
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, coord: &TileCoord) -> bool {
        (self.min_x..=self.max_x).contains(&coord.x) && (self.min_z..=self.max_z).contains(&coord.z)
    }

    /// Largest of the x and z spans (`max - min`), widened to avoid overflow.
    #[inline]
    pub fn max_span(&self) -> u64 {
        let dx = (self.max_x as i64 - self.min_x as i64) as u64;
        let dz = (self.max_z as i64 - self.min_z as i64) as u64;
        dx.max(dz)
    }
}

/// Inclusive `[min, max]` range along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Range covering every representable coordinate.
    pub const fn unbounded() -> Self {
        Self {
            min: i32::MIN,
            max: i32::MAX,
        }
    }

    #[inline]
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Region of interest used to pre-filter discovered base tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionBounds {
    pub x: AxisRange,
    pub z: AxisRange,
}

impl RegionBounds {
    pub const fn new(x: AxisRange, z: AxisRange) -> Self {
        Self { x, z }
    }

    /// Region that accepts every tile.
    pub const fn unbounded() -> Self {
        Self {
            x: AxisRange::unbounded(),
            z: AxisRange::unbounded(),
        }
    }

    #[inline]
    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.x.contains(coord.x) && self.z.contains(coord.z)
    }

    /// Rejects inverted ranges.
    pub fn validate(&self) -> PyramidResult<()> {
        if !self.x.is_valid() {
            return Err(PyramidError::Config(format!(
                "x bounds {} have min greater than max",
                self.x
            )));
        }
        if !self.z.is_valid() {
            return Err(PyramidError::Config(format!(
                "z bounds {} have min greater than max",
                self.z
            )));
        }
        Ok(())
    }
}
