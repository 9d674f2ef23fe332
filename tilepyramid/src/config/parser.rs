//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::MAP_SECTION_PREFIX;
use super::file::ConfigFileError;
use super::settings::{ConfigFile, MapSettings};
use crate::coord::{AxisRange, DEFAULT_EXTENSION};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [build] section
    if let Some(section) = ini.section(Some("build")) {
        if let Some(v) = section.get("threads") {
            config.build.threads = match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid("build", "threads", v, "must be a positive integer")),
            };
        }
        if let Some(v) = section.get("compression") {
            config.build.compression = v
                .parse()
                .map_err(|_| invalid("build", "compression", v, "must be 'none' or 'posterize'"))?;
        }
        if let Some(v) = section.get("posterize_bits") {
            config.build.posterize_bits = match v.parse::<u8>() {
                Ok(n) if (1..=8).contains(&n) => n,
                _ => {
                    return Err(invalid(
                        "build",
                        "posterize_bits",
                        v,
                        "must be an integer from 1 to 8",
                    ))
                }
            };
        }
        if let Some(v) = section.get("extension") {
            // Combined tiles are always PNG-encoded, so no other format round-trips
            let v = v.trim().trim_start_matches('.').to_ascii_lowercase();
            if v != DEFAULT_EXTENSION {
                return Err(invalid(
                    "build",
                    "extension",
                    &v,
                    "only 'png' tiles are supported",
                ));
            }
            config.build.extension = v;
        }
        if let Some(v) = section.get("frontier") {
            config.build.frontier = v
                .parse()
                .map_err(|_| invalid("build", "frontier", v, "must be 'changed' or 'full'"))?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    // [map.<name>] sections, in file order
    for (name, section) in ini.iter() {
        let Some(map_name) = name.and_then(|n| n.strip_prefix(MAP_SECTION_PREFIX)) else {
            continue;
        };
        let section_name = format!("{}{}", MAP_SECTION_PREFIX, map_name);
        if map_name.trim().is_empty() {
            return Err(invalid(&section_name, "name", map_name, "map name must not be empty"));
        }
        if config.map(map_name).is_some() {
            return Err(invalid(&section_name, "name", map_name, "duplicate map section"));
        }
        config.maps.push(parse_map(&section_name, map_name, section)?);
    }

    Ok(config)
}

fn parse_map(
    section_name: &str,
    map_name: &str,
    section: &Properties,
) -> Result<MapSettings, ConfigFileError> {
    let required_path = |key: &str| -> Result<PathBuf, ConfigFileError> {
        match section.get(key).map(str::trim) {
            Some(v) if !v.is_empty() => Ok(expand_tilde(v)),
            _ => Err(invalid(section_name, key, "", "required")),
        }
    };

    let dimension = section
        .get("dimension")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(map_name)
        .to_string();

    let bounds_x = optional_range(section_name, section, "bounds_x")?;
    let bounds_z = optional_range(section_name, section, "bounds_z")?;

    Ok(MapSettings {
        name: map_name.to_string(),
        dimension,
        source_dir: required_path("source_dir")?,
        output_dir: required_path("output_dir")?,
        bounds_x,
        bounds_z,
    })
}

fn optional_range(
    section_name: &str,
    section: &Properties,
    key: &str,
) -> Result<AxisRange, ConfigFileError> {
    match section.get(key).map(str::trim) {
        None | Some("") => Ok(AxisRange::unbounded()),
        Some(v) => parse_range(v).map_err(|reason| invalid(section_name, key, v, &reason)),
    }
}

/// Parse an inclusive range written as `min, max`.
pub(super) fn parse_range(value: &str) -> Result<AxisRange, String> {
    let mut parts = value.split(',').map(str::trim);
    let (Some(min), Some(max), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("expected 'min, max'".to_string());
    };
    let min = i32::from_str(min).map_err(|_| format!("'{}' is not an integer", min))?;
    let max = i32::from_str(max).map_err(|_| format!("'{}' is not an integer", max))?;
    let range = AxisRange::new(min, max);
    if !range.is_valid() {
        return Err("min must not be greater than max".to_string());
    }
    Ok(range)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
