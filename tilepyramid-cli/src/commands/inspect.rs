//! Inspect command: summarize a built pyramid from its manifest.

use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tilepyramid::coord::TileLayout;
use tilepyramid::manifest::PyramidManifest;

use crate::error::CliError;

/// Arguments for the inspect command.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Pyramid output directory (contains tile.properties.json)
    pub output_dir: PathBuf,

    /// Tile file extension to count
    #[arg(long, default_value = "png")]
    pub extension: String,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> Result<(), CliError> {
    let manifest =
        PyramidManifest::read_from(&args.output_dir).map_err(|error| CliError::Inspect {
            path: args.output_dir.clone(),
            error,
        })?;
    let layout = TileLayout::new(&args.output_dir, &args.extension);

    println!("Pyramid: {}", args.output_dir.display());
    println!("  Map:       {}", manifest.map_name);
    println!("  Dimension: {}", manifest.dimension);
    println!("  Tile size: {}", manifest.tile_size);
    println!(
        "  Zoom:      {} to {}",
        manifest.max_zoom, manifest.min_zoom
    );
    println!(
        "  Regions:   x [{}, {}], z [{}, {}]",
        manifest.regions.min_x,
        manifest.regions.max_x,
        manifest.regions.min_z,
        manifest.regions.max_z
    );
    println!();
    println!("  Tiles per level:");
    for zoom in manifest.zoom_levels() {
        println!("    z.{:<4} {}", zoom, count_tiles(&layout, zoom));
    }
    Ok(())
}

/// Number of tile files on one level; a missing level directory counts as empty.
fn count_tiles(layout: &TileLayout, zoom: i32) -> usize {
    let dir = layout.zoom_dir(zoom);
    list_names(&dir)
        .iter()
        .filter(|name| layout.parse(name).is_some())
        .count()
}

fn list_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect()
}
