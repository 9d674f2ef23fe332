//! Init command: write an example configuration file.

use clap::Args;
use std::path::PathBuf;
use tilepyramid::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Where to write the config file (default: ~/.tilepyramid/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the init command.
pub fn run(args: InitArgs) -> Result<(), CliError> {
    let path = args.config.unwrap_or_else(config_file_path);

    if ConfigFile::write_example_if_missing(&path)? {
        println!("Wrote example configuration to {}", path.display());
        println!("Edit the [map.overworld] section, then run: tilepyramid build");
    } else {
        println!("Configuration already exists at {}", path.display());
    }
    Ok(())
}
