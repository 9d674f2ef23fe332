//! Change detection for incremental builds.
//!
//! A base tile needs (re)processing when its level-0 output is missing or
//! older than the source. Detection only reads filesystem metadata.

use crate::coord::TileCoord;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A source tile discovered for one map build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTile {
    /// Level-0 grid position
    pub coord: TileCoord,
    /// Tile produced by the upstream renderer
    pub source_path: PathBuf,
    /// Compressed copy in the pyramid's level-0 directory
    pub output_path: PathBuf,
    /// Whether the output is missing or stale
    pub needs_update: bool,
}

impl BaseTile {
    /// Create a base tile and classify it against the filesystem.
    pub fn discover(coord: TileCoord, source_path: PathBuf, output_path: PathBuf) -> Self {
        let needs_update = needs_update(&source_path, &output_path);
        Self {
            coord,
            source_path,
            output_path,
            needs_update,
        }
    }

    /// Re-read filesystem metadata and refresh `needs_update`.
    pub fn classify(&mut self) -> bool {
        self.needs_update = needs_update(&self.source_path, &self.output_path);
        self.needs_update
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Decide whether `source` must be reprocessed into `output`.
///
/// - `true` if `output` does not exist
/// - `true` if `source` was modified strictly after `output`
/// - `false` otherwise
///
/// If the source's timestamp cannot be read the tile is reported as changed,
/// so the compression job surfaces the underlying error.
pub fn needs_update(source: &Path, output: &Path) -> bool {
    let Some(output_mtime) = modified(output) else {
        return true;
    };
    match modified(source) {
        Some(source_mtime) => source_mtime > output_mtime,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, mtime: SystemTime) {
        let file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .unwrap();
        file.set_modified(mtime).unwrap();
    }

    #[test]
    fn test_missing_output_needs_update() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("r.0.0.png");
        touch(&source, SystemTime::now());

        assert!(needs_update(&source, &dir.path().join("out.png")));
    }

    #[test]
    fn test_newer_source_needs_update() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.png");
        let output = dir.path().join("out.png");
        let base = SystemTime::now() - Duration::from_secs(3600);
        touch(&output, base);
        touch(&source, base + Duration::from_secs(10));

        assert!(needs_update(&source, &output));
    }

    #[test]
    fn test_older_source_is_current() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.png");
        let output = dir.path().join("out.png");
        let base = SystemTime::now() - Duration::from_secs(3600);
        touch(&source, base);
        touch(&output, base + Duration::from_secs(10));

        assert!(!needs_update(&source, &output));
    }

    #[test]
    fn test_equal_mtime_is_current() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.png");
        let output = dir.path().join("out.png");
        let base = SystemTime::now() - Duration::from_secs(3600);
        touch(&source, base);
        touch(&output, base);

        assert!(!needs_update(&source, &output));
    }

    #[test]
    fn test_unreadable_source_with_output_needs_update() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.png");
        touch(&output, SystemTime::now());

        assert!(needs_update(&dir.path().join("gone.png"), &output));
    }

    #[test]
    fn test_classify_refreshes_flag() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.png");
        let output = dir.path().join("out.png");
        let base = SystemTime::now() - Duration::from_secs(3600);
        touch(&source, base);

        let mut tile = BaseTile::discover(TileCoord::new(0, 0), source.clone(), output.clone());
        assert!(tile.needs_update);

        touch(&output, base + Duration::from_secs(5));
        assert!(!tile.classify());

        touch(&source, base + Duration::from_secs(60));
        assert!(tile.classify());
    }
}
