//! Tile filename and output directory layout.
//!
//! Source tiles are named `r.<x>.<z>.<ext>`, e.g. `r.-3.12.png`. The output
//! pyramid stores level `zoom` under `z.<zoom>/` using the same file naming,
//! with the manifest at the root:
//!
//! ```text
//! <root>/tile.properties.json
//! <root>/z.0/r.0.0.png
//! <root>/z.-1/r.0.0.png
//! ```
//!
//! Every path in the crate is produced by [`TileLayout`], so parsing and
//! formatting always agree.

use crate::coord::TileCoord;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default tile image extension.
pub const DEFAULT_EXTENSION: &str = "png";

/// Name of the pyramid manifest file at the output root.
pub const MANIFEST_FILENAME: &str = "tile.properties.json";

/// Pattern: `r.<signed int>.<signed int>.<ext>`
///
/// - Group 1: x coordinate
/// - Group 2: z coordinate
/// - Group 3: extension
fn tile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^r\.(-?\d+)\.(-?\d+)\.([A-Za-z0-9]+)$").expect("tile pattern is valid")
    })
}

/// Parse a tile filename into its coordinate and extension.
///
/// Returns `None` for anything that does not match the naming pattern,
/// including coordinates that overflow `i32`.
///
/// # Examples
///
/// ```
/// use tilepyramid::coord::{parse_tile_filename, TileCoord};
///
/// let (coord, ext) = parse_tile_filename("r.-3.12.png").unwrap();
/// assert_eq!(coord, TileCoord::new(-3, 12));
/// assert_eq!(ext, "png");
/// assert!(parse_tile_filename("rendered.json.gz").is_none());
/// ```
pub fn parse_tile_filename(name: &str) -> Option<(TileCoord, &str)> {
    let captures = tile_pattern().captures(name)?;
    let x = captures.get(1)?.as_str().parse::<i32>().ok()?;
    let z = captures.get(2)?.as_str().parse::<i32>().ok()?;
    let ext = captures.get(3)?.as_str();
    Some((TileCoord::new(x, z), ext))
}

/// Coordinate↔path codec for one pyramid output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout {
    root: PathBuf,
    extension: String,
}

impl TileLayout {
    /// Create a layout rooted at `root` using tiles with the given extension.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Filename for a tile at any level: `r.<x>.<z>.<ext>`.
    pub fn file_name(&self, coord: &TileCoord) -> String {
        format!("r.{}.{}.{}", coord.x, coord.z, self.extension)
    }

    /// Parse a filename, accepting only this layout's extension.
    ///
    /// Only the canonical spelling of a coordinate is accepted: `r.00.0.png`
    /// and `r.-0.0.png` would otherwise alias `r.0.0.png` and map two source
    /// files onto one output tile.
    pub fn parse(&self, name: &str) -> Option<TileCoord> {
        match parse_tile_filename(name) {
            Some((coord, ext)) if ext == self.extension && self.file_name(&coord) == name => {
                Some(coord)
            }
            _ => None,
        }
    }

    /// Directory holding all tiles of one zoom level.
    pub fn zoom_dir(&self, zoom: i32) -> PathBuf {
        self.root.join(format!("z.{}", zoom))
    }

    /// Full path of a tile at a zoom level.
    pub fn tile_path(&self, zoom: i32, coord: &TileCoord) -> PathBuf {
        self.zoom_dir(zoom).join(self.file_name(coord))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        let (coord, ext) = parse_tile_filename("r.1.2.png").unwrap();
        assert_eq!(coord, TileCoord::new(1, 2));
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_parse_negative() {
        let (coord, _) = parse_tile_filename("r.-14.-7.png").unwrap();
        assert_eq!(coord, TileCoord::new(-14, -7));
    }

    #[test]
    fn test_parse_rejects_non_matching() {
        assert!(parse_tile_filename("rendered.json.gz").is_none());
        assert!(parse_tile_filename("r.1.png").is_none());
        assert!(parse_tile_filename("r.a.b.png").is_none());
        assert!(parse_tile_filename("r.1.2").is_none());
        assert!(parse_tile_filename("xr.1.2.png").is_none());
        assert!(parse_tile_filename("r.1.2.png.tmp.bak").is_none());
        assert!(parse_tile_filename("").is_none());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(parse_tile_filename("r.99999999999.0.png").is_none());
    }

    #[test]
    fn test_layout_filters_extension() {
        let layout = TileLayout::new("/out", "png");
        assert_eq!(layout.parse("r.3.4.png"), Some(TileCoord::new(3, 4)));
        assert_eq!(layout.parse("r.3.4.jpg"), None);
    }

    #[test]
    fn test_layout_rejects_non_canonical_spellings() {
        let layout = TileLayout::new("/out", "png");
        for name in ["r.00.0.png", "r.-0.0.png", "r.000.0.png", "r.0.-0.png", "r.+1.0.png"] {
            assert_eq!(layout.parse(name), None, "{}", name);
        }
        assert_eq!(layout.parse("r.0.0.png"), Some(TileCoord::new(0, 0)));
        assert_eq!(layout.parse("r.-10.0.png"), Some(TileCoord::new(-10, 0)));
    }

    #[test]
    fn test_zoom_dir_naming() {
        let layout = TileLayout::new("/out", "png");
        assert_eq!(layout.zoom_dir(0), PathBuf::from("/out/z.0"));
        assert_eq!(layout.zoom_dir(-3), PathBuf::from("/out/z.-3"));
    }

    #[test]
    fn test_tile_path() {
        let layout = TileLayout::new("/out", "png");
        assert_eq!(
            layout.tile_path(-1, &TileCoord::new(-2, 5)),
            PathBuf::from("/out/z.-1/r.-2.5.png")
        );
    }

    #[test]
    fn test_manifest_path() {
        let layout = TileLayout::new("/out", "png");
        assert_eq!(
            layout.manifest_path(),
            PathBuf::from("/out/tile.properties.json")
        );
    }

    #[test]
    fn test_format_parse_roundtrip() {
        let layout = TileLayout::new("/out", "webp");
        for x in [-1025, -2, -1, 0, 1, 7, 4096] {
            for z in [-9, 0, 3] {
                let coord = TileCoord::new(x, z);
                let name = layout.file_name(&coord);
                assert_eq!(layout.parse(&name), Some(coord), "roundtrip of {}", name);
            }
        }
    }
}
