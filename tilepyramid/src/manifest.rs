//! Pyramid manifest (`tile.properties.json`).
//!
//! The manifest tells a map viewer how to address the pyramid: which zoom
//! levels exist, the tile size, and the level-0 extent. It is written once,
//! after every level of a build has completed; a pyramid directory without a
//! manifest is an incomplete build.

use crate::coord::{BoundingBox, TileLayout, MANIFEST_FILENAME, MAX_ZOOM};
use crate::error::{PyramidError, PyramidResult};
use crate::storage::write_atomic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Edge length in pixels advertised to the viewer.
pub const TILE_SIZE: u32 = 512;

/// Metadata describing a finished pyramid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidManifest {
    pub map_name: String,
    /// Dimension or category label (e.g. "overworld")
    pub dimension: String,
    pub tile_size: u32,
    /// Finest level, always 0
    pub max_zoom: i32,
    /// Coarsest level
    pub min_zoom: i32,
    /// Level-0 extent of the full map
    pub regions: BoundingBox,
}

impl PyramidManifest {
    pub fn new(
        map_name: impl Into<String>,
        dimension: impl Into<String>,
        min_zoom: i32,
        regions: BoundingBox,
    ) -> Self {
        Self {
            map_name: map_name.into(),
            dimension: dimension.into(),
            tile_size: TILE_SIZE,
            max_zoom: MAX_ZOOM,
            min_zoom,
            regions,
        }
    }

    /// Zoom levels covered, finest first (`0, -1, ..., min_zoom`).
    pub fn zoom_levels(&self) -> impl Iterator<Item = i32> {
        (self.min_zoom..=self.max_zoom).rev()
    }

    pub fn to_json(&self) -> PyramidResult<String> {
        serde_json::to_string(self).map_err(|e| PyramidError::Encode(e.to_string()))
    }

    /// Write the manifest into the layout's root directory.
    pub fn write(&self, layout: &TileLayout) -> PyramidResult<()> {
        let path = layout.manifest_path();
        fs::create_dir_all(layout.root()).map_err(|e| PyramidError::io(layout.root(), e))?;
        write_atomic(&path, self.to_json()?.as_bytes())
    }

    /// Read the manifest from a pyramid output directory.
    pub fn read_from(dir: &Path) -> PyramidResult<Self> {
        let path = dir.join(MANIFEST_FILENAME);
        let data = fs::read(&path).map_err(|e| PyramidError::io(&path, e))?;
        serde_json::from_slice(&data).map_err(|e| PyramidError::decode(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> PyramidManifest {
        PyramidManifest::new(
            "overworld",
            "overworld",
            -1,
            BoundingBox {
                min_x: 0,
                max_x: 2,
                min_z: 0,
                max_z: 1,
            },
        )
    }

    #[test]
    fn test_json_field_names() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();

        assert_eq!(json["mapName"], "overworld");
        assert_eq!(json["dimension"], "overworld");
        assert_eq!(json["tileSize"], 512);
        assert_eq!(json["maxZoom"], 0);
        assert_eq!(json["minZoom"], -1);
        assert_eq!(json["regions"]["minX"], 0);
        assert_eq!(json["regions"]["maxX"], 2);
        assert_eq!(json["regions"]["minZ"], 0);
        assert_eq!(json["regions"]["maxZ"], 1);
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let layout = TileLayout::new(dir.path().join("overworld"), "png");

        sample().write(&layout).unwrap();
        let read = PyramidManifest::read_from(layout.root()).unwrap();

        assert_eq!(read, sample());
    }

    #[test]
    fn test_read_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = PyramidManifest::read_from(dir.path());
        assert!(matches!(result, Err(PyramidError::Io { .. })));
    }

    #[test]
    fn test_read_corrupt_is_decode_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "{ not json").unwrap();
        let result = PyramidManifest::read_from(dir.path());
        assert!(matches!(result, Err(PyramidError::Decode { .. })));
    }

    #[test]
    fn test_zoom_levels() {
        let mut manifest = sample();
        manifest.min_zoom = -3;
        assert_eq!(manifest.zoom_levels().collect::<Vec<_>>(), vec![0, -1, -2, -3]);
    }
}
