//! tilepyramid CLI - Command-line interface
//!
//! Builds zoomable tile pyramids from directories of rendered map tiles.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use commands::{build, init, inspect};

#[derive(Parser)]
#[command(name = "tilepyramid")]
#[command(version = tilepyramid::VERSION)]
#[command(about = "Build zoomable tile pyramids from rendered map tiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or incrementally update the configured maps
    Build(build::BuildArgs),
    /// Show the manifest and per-level tile counts of a built pyramid
    Inspect(inspect::InspectArgs),
    /// Write an example configuration file
    Init(init::InitArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build(args) => build::run(args),
        Commands::Inspect(args) => inspect::run(args),
        Commands::Init(args) => init::run(args),
    };

    if let Err(e) = result {
        e.exit();
    }
}
