//! Pyramid builder: level-by-level orchestration of one map.
//!
//! ```text
//! discover ─► classify ─► compress changed ─► zoom -1 ─► zoom -2 ─► ... ─► manifest
//!                          (batch, barrier)   (batch)    (batch)
//! ```
//!
//! Each level is one batch on the shared [`WorkerPool`]. The builder blocks
//! until the batch has fully reported before computing the next level's
//! parents, so a combine job always sees its children finished on disk.

use super::discovery::discover_base_tiles;
use super::progress::{BuildProgress, BuildProgressCallback};
use super::request::MapRequest;
use crate::coord::{min_zoom_for, BoundingBox, TileCoord, TileLayout, DEFAULT_EXTENSION};
use crate::error::{PyramidError, PyramidResult};
use crate::log::Logger;
use crate::manifest::PyramidManifest;
use crate::pool::{CompressJob, Job, JobOutcome, JobReport, QuadrantJob, WorkerPool};
use crate::{log_debug, log_error, log_info, log_warn};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::str::FromStr;
use std::sync::Arc;

/// Which level-0 coordinates seed the first coarser level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontierPolicy {
    /// Only tiles written in this run; unchanged maps touch no coarser level
    #[default]
    Changed,
    /// Every discovered tile; rebuilds every ancestor
    Full,
}

impl fmt::Display for FrontierPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontierPolicy::Changed => write!(f, "changed"),
            FrontierPolicy::Full => write!(f, "full"),
        }
    }
}

impl FromStr for FrontierPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "changed" => Ok(FrontierPolicy::Changed),
            "full" => Ok(FrontierPolicy::Full),
            other => Err(format!(
                "unknown frontier policy '{}' (expected 'changed' or 'full')",
                other
            )),
        }
    }
}

/// Options shared by every map a builder processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Tile file extension for both source and output
    pub extension: String,
    pub frontier: FrontierPolicy,
    /// Remove the map's output directory before building
    pub force: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            frontier: FrontierPolicy::default(),
            force: false,
        }
    }
}

/// Job counts for one level of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub zoom: i32,
    /// Jobs submitted (one per distinct target tile)
    pub jobs: usize,
    pub written: usize,
    /// Combine jobs that found no children
    pub no_output: usize,
    pub failed: usize,
}

/// Result of building one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub map_name: String,
    /// Base tiles found in the source directory (after bounds filtering)
    pub discovered: usize,
    /// Base tiles whose level-0 output was missing or stale
    pub changed: usize,
    /// Coarsest level, `None` for an empty map
    pub min_zoom: Option<i32>,
    /// Per-level counts, level 0 first; levels that were never reached are absent
    pub levels: Vec<LevelSummary>,
    pub manifest_written: bool,
}

impl BuildSummary {
    fn new(map_name: &str) -> Self {
        Self {
            map_name: map_name.to_string(),
            discovered: 0,
            changed: 0,
            min_zoom: None,
            levels: Vec::new(),
            manifest_written: false,
        }
    }

    /// Tiles written across every level.
    pub fn tiles_written(&self) -> usize {
        self.levels.iter().map(|l| l.written).sum()
    }

    /// Jobs that failed across every level.
    pub fn failed(&self) -> usize {
        self.levels.iter().map(|l| l.failed).sum()
    }

    /// Counts for one level, if it was processed.
    pub fn level(&self, zoom: i32) -> Option<&LevelSummary> {
        self.levels.iter().find(|l| l.zoom == zoom)
    }
}

/// Builds tile pyramids on a shared worker pool.
pub struct PyramidBuilder<'a> {
    pool: &'a WorkerPool,
    logger: Arc<dyn Logger>,
    options: BuildOptions,
    progress: Option<BuildProgressCallback>,
}

impl<'a> PyramidBuilder<'a> {
    pub fn new(pool: &'a WorkerPool, logger: Arc<dyn Logger>) -> Self {
        Self {
            pool,
            logger,
            options: BuildOptions::default(),
            progress: None,
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_policy(mut self, frontier: FrontierPolicy) -> Self {
        self.options.frontier = frontier;
        self
    }

    pub fn with_progress(mut self, callback: BuildProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    fn report(&self, progress: BuildProgress) {
        if let Some(callback) = &self.progress {
            callback(progress);
        }
    }

    /// Build or incrementally update the pyramid for one map.
    ///
    /// # Errors
    ///
    /// Structural problems fail the map before any job is submitted:
    /// `Config` for an invalid request and `SourceMissing` for a missing
    /// source directory. Failures to create level directories or to write the
    /// manifest are returned as `Io`. Individual job failures do not fail
    /// the build; they are logged and counted in the summary.
    pub fn build(&self, request: &MapRequest) -> PyramidResult<BuildSummary> {
        request.validate()?;
        let extension = self.options.extension.as_str();
        let source = request.source_layout(extension);
        let output = request.output_layout(extension);

        if self.options.force {
            self.clear_output(request)?;
        }

        let mut summary = BuildSummary::new(&request.name);
        self.report(BuildProgress::at_discovering(&request.name));

        let tiles = discover_base_tiles(&source, &output, &request.bounds)?;
        summary.discovered = tiles.len();
        if tiles.is_empty() {
            log_warn!(
                self.logger,
                "Map '{}': no tiles found in {}, skipping",
                request.name,
                request.source_dir.display()
            );
            return Ok(summary);
        }

        let bounds = BoundingBox::from_coords(tiles.iter().map(|t| t.coord))?;
        let min_zoom = min_zoom_for(&bounds);
        summary.min_zoom = Some(min_zoom);

        let changed: Vec<CompressJob> = tiles
            .iter()
            .filter(|tile| tile.needs_update)
            .map(|tile| CompressJob {
                coord: tile.coord,
                source: tile.source_path.clone(),
                output: tile.output_path.clone(),
            })
            .collect();
        summary.changed = changed.len();

        log_info!(
            self.logger,
            "Map '{}': {} tiles, {} changed, x [{}, {}], z [{}, {}], zoom 0 to {}",
            request.name,
            tiles.len(),
            changed.len(),
            bounds.min_x,
            bounds.max_x,
            bounds.min_z,
            bounds.max_z,
            min_zoom
        );

        let written = if changed.is_empty() {
            log_info!(self.logger, "Map '{}': nothing to update", request.name);
            Vec::new()
        } else {
            self.create_level_dir(&output, 0)?;
            let jobs = changed.into_iter().map(Job::CompressBaseTile).collect();
            self.run_level(request, 0, min_zoom, jobs, &mut summary)
        };

        let mut frontier = match self.options.frontier {
            FrontierPolicy::Changed => written,
            FrontierPolicy::Full => tiles.iter().map(|t| t.coord).collect(),
        };

        for zoom in (min_zoom..0).rev() {
            if frontier.is_empty() {
                log_debug!(
                    self.logger,
                    "Map '{}': no tiles changed at zoom {}, stopping",
                    request.name,
                    zoom + 1
                );
                break;
            }

            let parents: BTreeSet<TileCoord> = frontier.iter().map(TileCoord::parent).collect();
            self.create_level_dir(&output, zoom)?;
            let jobs = parents
                .into_iter()
                .map(|target| Job::CombineQuadrant(QuadrantJob::new(&output, zoom, target)))
                .collect();
            frontier = self.run_level(request, zoom, min_zoom, jobs, &mut summary);
        }

        let progress = BuildProgress::at_level(&request.name, 0, min_zoom, 0);
        self.report(progress.writing_manifest());
        PyramidManifest::new(&request.name, &request.dimension, min_zoom, bounds)
            .write(&output)?;
        summary.manifest_written = true;
        self.report(progress.complete());

        log_info!(
            self.logger,
            "Map '{}': done, {} tiles written, {} failed",
            request.name,
            summary.tiles_written(),
            summary.failed()
        );
        Ok(summary)
    }

    /// Remove the map's output directory ahead of a forced rebuild.
    ///
    /// Refuses when the source tiles live inside the output directory, since
    /// removing it would destroy the input.
    fn clear_output(&self, request: &MapRequest) -> PyramidResult<()> {
        if !request.output_dir.exists() {
            return Ok(());
        }
        let source = fs::canonicalize(&request.source_dir)
            .map_err(|_| PyramidError::SourceMissing(request.source_dir.clone()))?;
        let output = fs::canonicalize(&request.output_dir)
            .map_err(|e| PyramidError::io(&request.output_dir, e))?;
        if source.starts_with(&output) {
            return Err(PyramidError::Config(format!(
                "map '{}': source directory {} is inside output directory {}, refusing to remove it",
                request.name,
                request.source_dir.display(),
                request.output_dir.display()
            )));
        }

        log_info!(
            self.logger,
            "Map '{}': removing existing output {}",
            request.name,
            request.output_dir.display()
        );
        fs::remove_dir_all(&request.output_dir)
            .map_err(|e| PyramidError::io(&request.output_dir, e))
    }

    fn create_level_dir(&self, layout: &TileLayout, zoom: i32) -> PyramidResult<()> {
        let dir = layout.zoom_dir(zoom);
        fs::create_dir_all(&dir).map_err(|e| PyramidError::io(&dir, e))
    }

    /// Run one level's batch, record its counts, and return the coordinates
    /// that were written.
    fn run_level(
        &self,
        request: &MapRequest,
        zoom: i32,
        min_zoom: i32,
        jobs: Vec<Job>,
        summary: &mut BuildSummary,
    ) -> Vec<TileCoord> {
        let progress = BuildProgress::at_level(&request.name, zoom, min_zoom, jobs.len());
        self.report(progress.clone());
        log_debug!(
            self.logger,
            "Map '{}': zoom {} with {} jobs",
            request.name,
            zoom,
            jobs.len()
        );

        let mut level = LevelSummary {
            zoom,
            jobs: jobs.len(),
            written: 0,
            no_output: 0,
            failed: 0,
        };
        let reports = self.pool.run_batch(jobs);

        let mut written = Vec::with_capacity(reports.len());
        for report in reports {
            match report.result {
                Ok(JobOutcome::Written) => {
                    level.written += 1;
                    written.push(report.coord);
                }
                Ok(JobOutcome::NoOutput) => level.no_output += 1,
                Err(ref e) => {
                    level.failed += 1;
                    self.log_failure(request, &report, e);
                }
            }
        }

        self.report(progress.level_done(level.written));
        summary.levels.push(level);
        written
    }

    fn log_failure(&self, request: &MapRequest, report: &JobReport, error: &PyramidError) {
        log_error!(
            self.logger,
            "Map '{}': {} job for tile {} at zoom {} failed: {}",
            request.name,
            report.kind,
            report.coord,
            report.zoom,
            error
        );
    }
}
