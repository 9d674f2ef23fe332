//! Job payloads accepted by the worker pool.

use crate::coord::{TileCoord, TileLayout};
use crate::error::PyramidError;
use std::fmt;
use std::path::PathBuf;

/// Compress one source tile into the pyramid's level 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressJob {
    pub coord: TileCoord,
    pub source: PathBuf,
    pub output: PathBuf,
}

/// One of the four child positions feeding a combine job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSlot {
    pub coord: TileCoord,
    /// Where the child would be on disk; it may not exist
    pub path: PathBuf,
}

/// Combine up to four tiles at `zoom + 1` into one tile at `zoom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadrantJob {
    /// Level of the tile being produced
    pub zoom: i32,
    pub target: TileCoord,
    /// Children in quadrant order: top-left, top-right, bottom-left, bottom-right
    pub children: [ChildSlot; 4],
    pub output: PathBuf,
}

impl QuadrantJob {
    /// Build the combine job for `target` at `zoom`, resolving every path
    /// through the layout.
    pub fn new(layout: &TileLayout, zoom: i32, target: TileCoord) -> Self {
        let children = target.children().map(|coord| ChildSlot {
            coord,
            path: layout.tile_path(zoom + 1, &coord),
        });
        Self {
            zoom,
            target,
            children,
            output: layout.tile_path(zoom, &target),
        }
    }
}

/// Work submitted to the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    CompressBaseTile(CompressJob),
    CombineQuadrant(QuadrantJob),
}

impl Job {
    /// Level of the tile this job writes.
    pub fn zoom(&self) -> i32 {
        match self {
            Job::CompressBaseTile(_) => 0,
            Job::CombineQuadrant(job) => job.zoom,
        }
    }

    /// Coordinate of the tile this job writes.
    pub fn coord(&self) -> TileCoord {
        match self {
            Job::CompressBaseTile(job) => job.coord,
            Job::CombineQuadrant(job) => job.target,
        }
    }

    pub fn kind(&self) -> JobKind {
        match self {
            Job::CompressBaseTile(_) => JobKind::Compress,
            Job::CombineQuadrant(_) => JobKind::Combine,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Compress,
    Combine,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Compress => write!(f, "compress"),
            JobKind::Combine => write!(f, "combine"),
        }
    }
}

/// What a successful job did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The output tile was written
    Written,
    /// No child tiles existed, nothing was written
    NoOutput,
}

/// Per-job result returned from a batch.
#[derive(Debug)]
pub struct JobReport {
    pub kind: JobKind,
    pub zoom: i32,
    pub coord: TileCoord,
    pub result: Result<JobOutcome, PyramidError>,
}

impl JobReport {
    pub fn for_job(job: &Job, result: Result<JobOutcome, PyramidError>) -> Self {
        Self {
            kind: job.kind(),
            zoom: job.zoom(),
            coord: job.coord(),
            result,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self.result, Ok(JobOutcome::Written))
    }
}
