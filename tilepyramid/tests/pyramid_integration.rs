//! Integration tests for pyramid builds.
//!
//! These tests run complete builds against real PNG tiles on disk:
//! - The reference 5-tile map and its manifest
//! - Incremental reruns (no changes, one touched tile)
//! - Deduplication of combine jobs per level
//! - Negative coordinates and multi-level cascades
//! - Empty maps and full-rebuild frontier

use image::{Rgba, RgbaImage};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tilepyramid::coord::{TileCoord, TileLayout};
use tilepyramid::imaging::{CompressionKind, ImageCrateOps};
use tilepyramid::log::NoOpLogger;
use tilepyramid::manifest::PyramidManifest;
use tilepyramid::pool::{PoolConfig, WorkerPool};
use tilepyramid::pyramid::{FrontierPolicy, MapRequest, PyramidBuilder};

// =============================================================================
// Test Helpers
// =============================================================================

const ORANGE: Rgba<u8> = Rgba([240, 120, 0, 255]);

struct Fixture {
    _temp: TempDir,
    source: PathBuf,
    output: PathBuf,
}

impl Fixture {
    fn new(coords: &[(i32, i32)]) -> Self {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("tiles");
        let output = temp.path().join("pyramid");
        fs::create_dir_all(&source).unwrap();
        for &(x, z) in coords {
            write_png(&source.join(format!("r.{}.{}.png", x, z)), ORANGE);
        }
        Self {
            _temp: temp,
            source,
            output,
        }
    }

    fn request(&self) -> MapRequest {
        MapRequest::new("world", "overworld", &self.source, &self.output)
    }

    fn layout(&self) -> TileLayout {
        TileLayout::new(&self.output, "png")
    }

    /// Coordinates present on one output level, sorted.
    fn level(&self, zoom: i32) -> Vec<TileCoord> {
        let layout = self.layout();
        let Ok(entries) = fs::read_dir(layout.zoom_dir(zoom)) else {
            return Vec::new();
        };
        let mut coords: Vec<_> = entries
            .filter_map(Result::ok)
            .filter_map(|e| layout.parse(e.file_name().to_str()?))
            .collect();
        coords.sort();
        coords
    }

    /// Bytes and mtime of every file under the output directory.
    fn snapshot(&self) -> BTreeMap<PathBuf, (Vec<u8>, SystemTime)> {
        let mut files = BTreeMap::new();
        collect(&self.output, &mut files);
        files
    }
}

fn collect(dir: &Path, files: &mut BTreeMap<PathBuf, (Vec<u8>, SystemTime)>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(&path, files);
        } else {
            let modified = fs::metadata(&path).unwrap().modified().unwrap();
            files.insert(path.clone(), (fs::read(&path).unwrap(), modified));
        }
    }
}

fn write_png(path: &Path, color: Rgba<u8>) {
    RgbaImage::from_pixel(32, 32, color).save(path).unwrap();
}

fn set_mtime(path: &Path, mtime: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

fn pool(compression: CompressionKind) -> WorkerPool {
    WorkerPool::new(
        PoolConfig::default().with_threads(4),
        Arc::new(ImageCrateOps::new()),
        compression.build(6).unwrap(),
        Arc::new(NoOpLogger),
    )
    .unwrap()
}

fn coords(list: &[(i32, i32)]) -> Vec<TileCoord> {
    list.iter().map(|&(x, z)| TileCoord::new(x, z)).collect()
}

const FIVE_TILES: [(i32, i32); 5] = [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1)];

// =============================================================================
// Full builds
// =============================================================================

#[test]
fn test_five_tile_map() {
    let fixture = Fixture::new(&FIVE_TILES);
    let pool = pool(CompressionKind::None);

    let summary = PyramidBuilder::new(&pool, Arc::new(NoOpLogger))
        .build(&fixture.request())
        .unwrap();

    assert_eq!(summary.discovered, 5);
    assert_eq!(summary.changed, 5);
    assert_eq!(summary.min_zoom, Some(-1));
    assert_eq!(summary.failed(), 0);
    assert!(summary.manifest_written);

    assert_eq!(
        fixture.level(0),
        coords(&[(0, 0), (0, 1), (1, 0), (2, 0), (2, 1)])
    );
    assert_eq!(fixture.level(-1), coords(&[(0, 0), (1, 0)]));
    assert!(fixture.level(-2).is_empty());

    let manifest = PyramidManifest::read_from(&fixture.output).unwrap();
    assert_eq!(manifest.map_name, "world");
    assert_eq!(manifest.dimension, "overworld");
    assert_eq!(manifest.tile_size, 512);
    assert_eq!(manifest.max_zoom, 0);
    assert_eq!(manifest.min_zoom, -1);
    assert_eq!(
        (
            manifest.regions.min_x,
            manifest.regions.max_x,
            manifest.regions.min_z,
            manifest.regions.max_z
        ),
        (0, 2, 0, 1)
    );
}

#[test]
fn test_reference_scenario_full_and_partial_parents() {
    let fixture = Fixture::new(&[]);
    let colors = [
        ((0, 0), Rgba([255, 0, 0, 255])),
        ((1, 0), Rgba([0, 255, 0, 255])),
        ((0, 1), Rgba([0, 0, 255, 255])),
        ((1, 1), Rgba([255, 255, 255, 255])),
        ((2, 0), ORANGE),
    ];
    for ((x, z), color) in colors {
        write_png(&fixture.source.join(format!("r.{}.{}.png", x, z)), color);
    }
    let pool = pool(CompressionKind::None);

    let summary = PyramidBuilder::new(&pool, Arc::new(NoOpLogger))
        .build(&fixture.request())
        .unwrap();

    assert_eq!(summary.min_zoom, Some(-1));
    assert_eq!(summary.level(-1).unwrap().jobs, 2);
    assert_eq!(fixture.level(-1), coords(&[(0, 0), (1, 0)]));

    // (0,0) at zoom -1: all four children, row-major quadrants
    let full = image::open(fixture.layout().tile_path(-1, &TileCoord::new(0, 0)))
        .unwrap()
        .to_rgba8();
    assert_eq!(full.dimensions(), (32, 32));
    assert_eq!(*full.get_pixel(8, 8), colors[0].1);
    assert_eq!(*full.get_pixel(24, 8), colors[1].1);
    assert_eq!(*full.get_pixel(8, 24), colors[2].1);
    assert_eq!(*full.get_pixel(24, 24), colors[3].1);

    // (1,0) at zoom -1: only (2,0) in the top-left quadrant
    let partial = image::open(fixture.layout().tile_path(-1, &TileCoord::new(1, 0)))
        .unwrap()
        .to_rgba8();
    assert_eq!(*partial.get_pixel(8, 8), ORANGE);
    assert_eq!(partial.get_pixel(24, 8)[3], 0);
    assert_eq!(partial.get_pixel(8, 24)[3], 0);
    assert_eq!(partial.get_pixel(24, 24)[3], 0);

    let manifest = PyramidManifest::read_from(&fixture.output).unwrap();
    assert_eq!((manifest.max_zoom, manifest.min_zoom), (0, -1));
    assert_eq!(
        (
            manifest.regions.min_x,
            manifest.regions.max_x,
            manifest.regions.min_z,
            manifest.regions.max_z
        ),
        (0, 2, 0, 1)
    );
}

#[test]
fn test_partial_parent_keeps_missing_quadrants_transparent() {
    let fixture = Fixture::new(&FIVE_TILES);
    let pool = pool(CompressionKind::None);

    PyramidBuilder::new(&pool, Arc::new(NoOpLogger))
        .build(&fixture.request())
        .unwrap();

    // (1,0) at zoom -1 has children (2,0) and (2,1) on the left only
    let parent = image::open(fixture.layout().tile_path(-1, &TileCoord::new(1, 0)))
        .unwrap()
        .to_rgba8();
    assert_eq!(parent.dimensions(), (32, 32));
    assert_eq!(*parent.get_pixel(8, 8), ORANGE);
    assert_eq!(*parent.get_pixel(8, 24), ORANGE);
    assert_eq!(parent.get_pixel(24, 8)[3], 0);
    assert_eq!(parent.get_pixel(24, 24)[3], 0);
}

#[test]
fn test_combine_jobs_are_deduplicated_per_level() {
    let fixture = Fixture::new(&[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2)]);
    let pool = pool(CompressionKind::None);

    let summary = PyramidBuilder::new(&pool, Arc::new(NoOpLogger))
        .build(&fixture.request())
        .unwrap();

    let level = summary.level(-1).unwrap();
    assert_eq!(level.jobs, 2);
    assert_eq!(level.written, 2);
    assert_eq!(fixture.level(-1), coords(&[(0, 0), (1, 1)]));
}

#[test]
fn test_negative_coordinates_cascade() {
    let fixture = Fixture::new(&[(-3, -3), (4, 4)]);
    let pool = pool(CompressionKind::None);

    let summary = PyramidBuilder::new(&pool, Arc::new(NoOpLogger))
        .build(&fixture.request())
        .unwrap();

    assert_eq!(summary.min_zoom, Some(-2));
    assert_eq!(fixture.level(-1), coords(&[(-2, -2), (2, 2)]));
    assert_eq!(fixture.level(-2), coords(&[(-1, -1), (1, 1)]));
    assert!(fixture.level(-3).is_empty());

    // (-3,-3) is the bottom-right child of (-2,-2)
    let parent = image::open(fixture.layout().tile_path(-1, &TileCoord::new(-2, -2)))
        .unwrap()
        .to_rgba8();
    assert_eq!(*parent.get_pixel(24, 24), ORANGE);
    assert_eq!(parent.get_pixel(8, 8)[3], 0);
}

#[test]
fn test_empty_map_writes_nothing() {
    let fixture = Fixture::new(&[]);
    fs::write(fixture.source.join("README.txt"), "not a tile").unwrap();
    let pool = pool(CompressionKind::None);

    let summary = PyramidBuilder::new(&pool, Arc::new(NoOpLogger))
        .build(&fixture.request())
        .unwrap();

    assert_eq!(summary.discovered, 0);
    assert_eq!(summary.min_zoom, None);
    assert!(!summary.manifest_written);
    assert!(!fixture.output.exists());
}

// =============================================================================
// Incremental builds
// =============================================================================

#[test]
fn test_rerun_without_changes_writes_nothing() {
    let fixture = Fixture::new(&FIVE_TILES);
    let pool = pool(CompressionKind::Posterize);
    let builder = PyramidBuilder::new(&pool, Arc::new(NoOpLogger));

    builder.build(&fixture.request()).unwrap();
    let before = fixture.snapshot();

    let summary = builder.build(&fixture.request()).unwrap();

    assert_eq!(summary.changed, 0);
    assert_eq!(summary.tiles_written(), 0);
    assert!(summary.levels.is_empty());
    assert!(summary.manifest_written);

    let after = fixture.snapshot();
    assert_eq!(before.len(), after.len());
    for (path, (bytes, modified)) in &before {
        let (new_bytes, new_modified) = &after[path];
        assert_eq!(bytes, new_bytes, "{} changed", path.display());
        if path.extension().is_some_and(|e| e == "png") {
            assert_eq!(modified, new_modified, "{} rewritten", path.display());
        }
    }
}

#[test]
fn test_touching_one_tile_rebuilds_only_its_ancestors() {
    let fixture = Fixture::new(&FIVE_TILES);
    let pool = pool(CompressionKind::None);
    let builder = PyramidBuilder::new(&pool, Arc::new(NoOpLogger));
    builder.build(&fixture.request()).unwrap();

    let untouched_parent = fixture.layout().tile_path(-1, &TileCoord::new(0, 0));
    let touched_parent = fixture.layout().tile_path(-1, &TileCoord::new(1, 0));
    let untouched_before = fs::metadata(&untouched_parent).unwrap().modified().unwrap();

    // Replace (2,1) with a blue tile dated well after every output
    let touched = fixture.source.join("r.2.1.png");
    write_png(&touched, Rgba([0, 0, 255, 255]));
    set_mtime(&touched, SystemTime::now() + Duration::from_secs(3600));

    let summary = builder.build(&fixture.request()).unwrap();

    assert_eq!(summary.changed, 1);
    assert_eq!(summary.level(0).unwrap().written, 1);
    let level = summary.level(-1).unwrap();
    assert_eq!(level.jobs, 1);
    assert_eq!(level.written, 1);

    assert_eq!(
        fs::metadata(&untouched_parent).unwrap().modified().unwrap(),
        untouched_before
    );
    let parent = image::open(&touched_parent).unwrap().to_rgba8();
    assert_eq!(*parent.get_pixel(8, 24), Rgba([0, 0, 255, 255]));
    assert_eq!(*parent.get_pixel(8, 8), ORANGE);
}

#[test]
fn test_deleted_output_tile_is_regenerated() {
    let fixture = Fixture::new(&FIVE_TILES);
    let pool = pool(CompressionKind::None);
    let builder = PyramidBuilder::new(&pool, Arc::new(NoOpLogger));
    builder.build(&fixture.request()).unwrap();

    fs::remove_file(fixture.layout().tile_path(0, &TileCoord::new(0, 1))).unwrap();
    let summary = builder.build(&fixture.request()).unwrap();

    assert_eq!(summary.changed, 1);
    assert_eq!(fixture.level(0).len(), 5);
    assert_eq!(summary.level(-1).unwrap().jobs, 1);
}

#[test]
fn test_full_frontier_rebuilds_every_ancestor() {
    let fixture = Fixture::new(&FIVE_TILES);
    let pool = pool(CompressionKind::None);
    PyramidBuilder::new(&pool, Arc::new(NoOpLogger))
        .build(&fixture.request())
        .unwrap();

    let summary = PyramidBuilder::new(&pool, Arc::new(NoOpLogger))
        .with_policy(FrontierPolicy::Full)
        .build(&fixture.request())
        .unwrap();

    assert_eq!(summary.changed, 0);
    assert!(summary.level(0).is_none());
    assert_eq!(summary.level(-1).unwrap().written, 2);
}

#[test]
fn test_one_pool_serves_several_maps() {
    let first = Fixture::new(&[(0, 0), (2, 0)]);
    let second = Fixture::new(&FIVE_TILES);
    let pool = pool(CompressionKind::Posterize);
    let builder = PyramidBuilder::new(&pool, Arc::new(NoOpLogger));

    let a = builder.build(&first.request()).unwrap();
    let b = builder.build(&second.request()).unwrap();

    assert_eq!(a.tiles_written(), 4);
    assert_eq!(b.tiles_written(), 7);
    assert!(PyramidManifest::read_from(&first.output).is_ok());
    assert!(PyramidManifest::read_from(&second.output).is_ok());
}
