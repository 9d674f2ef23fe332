//! Configuration file support.
//!
//! `~/.tilepyramid/config.ini` holds the build settings shared by every map
//! plus one `[map.<name>]` section per map:
//!
//! ```
//! use tilepyramid::config::ConfigFile;
//!
//! let config = ConfigFile::from_ini_str(
//!     "[build]\nthreads = 4\n\n[map.overworld]\nsource_dir = /tiles\noutput_dir = /maps\n",
//! )?;
//! assert_eq!(config.build.threads, 4);
//! assert_eq!(config.maps[0].to_request().name, "overworld");
//! # Ok::<(), tilepyramid::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use file::{
    config_directory, config_file_path, default_log_path, num_cpus, BuildSettings, ConfigFile,
    ConfigFileError, LoggingSettings, MapSettings, MAP_SECTION_PREFIX,
};
