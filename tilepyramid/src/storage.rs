//! Atomic tile file writes.
//!
//! Tiles are written to a sibling temp file and renamed into place, so a
//! reader (or an interrupted run) never sees a half-written tile under its
//! final name.

use crate::error::{PyramidError, PyramidResult};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to a file name while it is being written.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Temp path used while writing `path`: same directory, `.tmp` appended.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("tile"));
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

/// Write `data` to `path` atomically.
///
/// The parent directory must already exist. On failure the temp file is
/// removed and the previous content of `path` (if any) is left untouched.
pub fn write_atomic(path: &Path, data: &[u8]) -> PyramidResult<()> {
    let temp_path = temp_path_for(path);

    if let Err(e) = fs::write(&temp_path, data) {
        let _ = fs::remove_file(&temp_path);
        return Err(PyramidError::io(&temp_path, e));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PyramidError::io(path, e)
    })
}
