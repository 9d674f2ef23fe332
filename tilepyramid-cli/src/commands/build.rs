//! Build command: build or incrementally update every configured map.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tilepyramid::config::MapSettings;
use tilepyramid::pyramid::{
    BuildOptions, BuildPhase, BuildProgress, BuildSummary, FrontierPolicy, PyramidBuilder,
};
use tracing::{error, info};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the build command.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Config file (default: ~/.tilepyramid/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Build only the named map (repeatable; default: all maps)
    #[arg(long = "map", value_name = "NAME")]
    pub maps: Vec<String>,

    /// Worker threads (overrides [build] threads)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Delete each map's output directory before building
    #[arg(long)]
    pub force: bool,

    /// Rebuild every coarser level, not only those above changed tiles
    #[arg(long)]
    pub full_rebuild: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Run the build command.
pub fn run(args: BuildArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("build");

    let maps = select_maps(&runner.config().maps, &args.maps)?;
    let build = &runner.config().build;
    let options = BuildOptions {
        extension: build.extension.clone(),
        frontier: if args.full_rebuild {
            FrontierPolicy::Full
        } else {
            build.frontier
        },
        force: args.force,
    };

    let mut pool = runner.create_pool(args.threads)?;
    let builder = PyramidBuilder::new(&pool, runner.logger())
        .with_options(options)
        .with_progress(Arc::new(print_progress));

    let mut failed = Vec::new();
    for map in &maps {
        println!("Building map '{}'", map.name);
        match builder.build(&map.to_request()) {
            Ok(summary) => print_summary(&summary),
            Err(e) => {
                error!("Map '{}' failed: {}", map.name, e);
                eprintln!("  Map '{}' failed: {}", map.name, e);
                failed.push(map.name.clone());
            }
        }
    }

    drop(builder);
    pool.shutdown();

    if failed.is_empty() {
        info!("All {} map(s) built", maps.len());
        Ok(())
    } else {
        Err(CliError::MapsFailed(failed))
    }
}

/// Pick the maps named on the command line, or all maps when none are named.
fn select_maps<'a>(
    configured: &'a [MapSettings],
    requested: &[String],
) -> Result<Vec<&'a MapSettings>, CliError> {
    if configured.is_empty() {
        return Err(CliError::Config("no maps configured".to_string()));
    }
    if requested.is_empty() {
        return Ok(configured.iter().collect());
    }

    requested
        .iter()
        .map(|name| {
            configured
                .iter()
                .find(|m| &m.name == name)
                .ok_or_else(|| CliError::Config(format!("unknown map '{}'", name)))
        })
        .collect()
}

fn print_progress(progress: BuildProgress) {
    match progress.phase {
        BuildPhase::Compressing | BuildPhase::Combining if !progress.finished => {
            println!(
                "  zoom {:>3}: {} {} job(s)",
                progress.zoom, progress.phase, progress.jobs
            );
        }
        BuildPhase::Compressing | BuildPhase::Combining => {
            println!(
                "  zoom {:>3}: {}/{} tile(s) written",
                progress.zoom, progress.written, progress.jobs
            );
        }
        BuildPhase::WritingManifest => println!("  {}", progress.phase),
        BuildPhase::Discovering | BuildPhase::Complete => {}
    }
}

fn print_summary(summary: &BuildSummary) {
    if summary.discovered == 0 {
        println!("  No tiles found, nothing built");
        return;
    }
    if summary.changed == 0 && summary.tiles_written() == 0 {
        println!("  {} tile(s), nothing to update", summary.discovered);
        return;
    }
    println!(
        "  {} tile(s), {} changed, {} written, {} failed",
        summary.discovered,
        summary.changed,
        summary.tiles_written(),
        summary.failed()
    );
}
