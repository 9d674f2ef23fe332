//! Execution of a single job on a worker thread.

use super::job::{CompressJob, Job, JobOutcome, QuadrantJob};
use crate::error::{PyramidError, PyramidResult};
use crate::imaging::{ImageOps, Placement, TileCompressor};
use crate::storage::write_atomic;
use std::fs;
use std::sync::Arc;

/// Runs jobs against the configured image backend and compressor.
///
/// Holds no mutable state; one instance is shared by every worker.
pub struct JobRunner {
    ops: Arc<dyn ImageOps>,
    compressor: Arc<dyn TileCompressor>,
}

impl JobRunner {
    pub fn new(ops: Arc<dyn ImageOps>, compressor: Arc<dyn TileCompressor>) -> Self {
        Self { ops, compressor }
    }

    pub fn run(&self, job: &Job) -> PyramidResult<JobOutcome> {
        match job {
            Job::CompressBaseTile(job) => self.compress_base_tile(job),
            Job::CombineQuadrant(job) => self.combine_quadrant(job),
        }
    }

    fn compress_base_tile(&self, job: &CompressJob) -> PyramidResult<JobOutcome> {
        let data = fs::read(&job.source).map_err(|e| PyramidError::io(&job.source, e))?;
        let compressed = self.compressor.compress(&data)?;
        write_atomic(&job.output, &compressed)?;
        Ok(JobOutcome::Written)
    }

    fn combine_quadrant(&self, job: &QuadrantJob) -> PyramidResult<JobOutcome> {
        let present: Vec<(usize, &std::path::Path)> = job
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.path.is_file())
            .map(|(index, child)| (index, child.path.as_path()))
            .collect();

        let Some(&(_, first)) = present.first() else {
            return Ok(JobOutcome::NoOutput);
        };

        // The first existing child fixes the tile dimensions for the parent
        let meta = self.ops.decode_metadata(first)?;
        let half_width = (meta.width / 2).max(1);
        let half_height = (meta.height / 2).max(1);

        let mut placements = Vec::with_capacity(present.len());
        for (index, path) in present {
            let child = self.ops.load(path)?;
            placements.push(Placement {
                image: self.ops.resize(&child, half_width, half_height),
                top: (index as u32 / 2) * half_height,
                left: (index as u32 % 2) * half_width,
            });
        }

        let canvas =
            self.ops
                .composite_on_transparent_canvas(meta.width, meta.height, &placements);
        let encoded = self.ops.encode_png(&canvas)?;
        let compressed = self.compressor.compress(&encoded)?;
        write_atomic(&job.output, &compressed)?;
        Ok(JobOutcome::Written)
    }
}
