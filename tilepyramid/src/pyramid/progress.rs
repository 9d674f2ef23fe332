//! Progress reporting for pyramid builds.
//!
//! The builder reports each phase through a callback so the CLI (or a test)
//! can follow a build without parsing log output.

use std::sync::Arc;

/// Progress callback for pyramid builds.
pub type BuildProgressCallback = Arc<dyn Fn(BuildProgress) + Send + Sync>;

/// Phase of a single map build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// Listing and classifying source tiles
    Discovering,
    /// Compressing changed base tiles into level 0
    Compressing,
    /// Combining one coarser level
    Combining,
    /// Writing the manifest
    WritingManifest,
    /// Finished
    Complete,
}

impl std::fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BuildPhase::Discovering => "discovering",
            BuildPhase::Compressing => "compressing",
            BuildPhase::Combining => "combining",
            BuildPhase::WritingManifest => "writing manifest",
            BuildPhase::Complete => "complete",
        };
        f.write_str(label)
    }
}

/// Progress update for one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProgress {
    pub map_name: String,
    pub phase: BuildPhase,
    /// Level being processed (0 while compressing)
    pub zoom: i32,
    /// Coarsest level of the pyramid
    pub min_zoom: i32,
    /// Jobs in the current batch
    pub jobs: usize,
    /// Tiles written by the current batch
    pub written: usize,
    /// Whether the current batch has fully reported
    pub finished: bool,
}

impl BuildProgress {
    pub fn at_discovering(map_name: &str) -> Self {
        Self {
            map_name: map_name.to_string(),
            phase: BuildPhase::Discovering,
            zoom: 0,
            min_zoom: 0,
            jobs: 0,
            written: 0,
            finished: false,
        }
    }

    pub fn at_level(map_name: &str, zoom: i32, min_zoom: i32, jobs: usize) -> Self {
        let phase = if zoom == 0 {
            BuildPhase::Compressing
        } else {
            BuildPhase::Combining
        };
        Self {
            map_name: map_name.to_string(),
            phase,
            zoom,
            min_zoom,
            jobs,
            written: 0,
            finished: false,
        }
    }

    /// Same level, batch finished with `written` tiles.
    pub fn level_done(&self, written: usize) -> Self {
        Self {
            written,
            finished: true,
            ..self.clone()
        }
    }

    pub fn writing_manifest(&self) -> Self {
        Self {
            phase: BuildPhase::WritingManifest,
            jobs: 0,
            written: 0,
            finished: false,
            ..self.clone()
        }
    }

    pub fn complete(&self) -> Self {
        Self {
            phase: BuildPhase::Complete,
            jobs: 0,
            written: 0,
            finished: true,
            ..self.clone()
        }
    }
}
