//! Map build requests.

use crate::coord::{RegionBounds, TileLayout};
use crate::error::{PyramidError, PyramidResult};
use std::path::PathBuf;

/// One map to turn into a pyramid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRequest {
    /// Map identifier, written to the manifest as `mapName`
    pub name: String,
    /// Dimension or category label (e.g. "overworld", "nether")
    pub dimension: String,
    /// Directory of `r.<x>.<z>.<ext>` tiles from the renderer
    pub source_dir: PathBuf,
    /// Pyramid root; receives `z.<zoom>/` directories and the manifest
    pub output_dir: PathBuf,
    /// Tiles outside this region are ignored
    pub bounds: RegionBounds,
}

impl MapRequest {
    pub fn new(
        name: impl Into<String>,
        dimension: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            dimension: dimension.into(),
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            bounds: RegionBounds::unbounded(),
        }
    }

    pub fn with_bounds(mut self, bounds: RegionBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Check the request before any filesystem access.
    ///
    /// # Errors
    ///
    /// Returns `PyramidError::Config` for an empty name or inverted bounds.
    pub fn validate(&self) -> PyramidResult<()> {
        if self.name.trim().is_empty() {
            return Err(PyramidError::Config("map name must not be empty".to_string()));
        }
        self.bounds
            .validate()
            .map_err(|e| PyramidError::Config(format!("map '{}': {}", self.name, e)))
    }

    /// Layout of the source tile directory.
    pub fn source_layout(&self, extension: &str) -> TileLayout {
        TileLayout::new(&self.source_dir, extension)
    }

    /// Layout of the pyramid output.
    pub fn output_layout(&self, extension: &str) -> TileLayout {
        TileLayout::new(&self.output_dir, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::AxisRange;

    #[test]
    fn test_default_bounds_accept_everything() {
        let request = MapRequest::new("world", "overworld", "/src", "/out");
        assert_eq!(request.bounds, RegionBounds::unbounded());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let request = MapRequest::new("world", "overworld", "/src", "/out").with_bounds(
            RegionBounds::new(AxisRange::new(5, -5), AxisRange::unbounded()),
        );

        match request.validate() {
            Err(PyramidError::Config(message)) => {
                assert!(message.contains("world"));
                assert!(message.contains("[5, -5]"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        let request = MapRequest::new("  ", "overworld", "/src", "/out");
        assert!(matches!(request.validate(), Err(PyramidError::Config(_))));
    }

    #[test]
    fn test_layouts() {
        let request = MapRequest::new("world", "overworld", "/src", "/out");
        assert_eq!(request.source_layout("png").root(), std::path::Path::new("/src"));
        assert_eq!(
            request.output_layout("png").zoom_dir(0),
            PathBuf::from("/out/z.0")
        );
    }
}
