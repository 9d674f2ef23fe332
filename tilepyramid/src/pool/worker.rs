//! Fixed-size worker thread pool with batch barriers.
//!
//! ```text
//! ┌───────────────────────────┐
//! │      PyramidBuilder       │  run_batch(jobs) blocks until
//! │  (one batch per level)    │  every job has reported
//! └─────────────┬─────────────┘
//!               │ WorkItem { index, job, reply }
//!               ▼
//! ┌───────────────────────────┐
//! │  shared mpsc work queue   │
//! └─────────────┬─────────────┘
//!       ┌───────┼───────┐
//!       ▼       ▼       ▼
//!   worker-0 worker-1 worker-N   JobRunner::run(job)
//! ```
//!
//! A panic inside a job is caught on the worker and reported as a
//! `PyramidError::Worker` for that job; the worker keeps serving the queue.

use super::job::{Job, JobKind, JobReport};
use super::runner::JobRunner;
use crate::coord::TileCoord;
use crate::error::{PyramidError, PyramidResult};
use crate::imaging::{ImageOps, TileCompressor};
use crate::log::Logger;
use crate::{log_debug, log_info, log_warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Configuration for the worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads (default: number of CPU cores)
    pub threads: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

impl PoolConfig {
    /// Set the number of worker threads. Zero is raised to one.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }
}

/// Work item for the thread pool.
struct WorkItem {
    index: usize,
    job: Job,
    reply: Sender<(usize, JobReport)>,
}

/// Pool of worker threads executing pyramid jobs.
///
/// Created once per process and shared across every map build.
pub struct WorkerPool {
    work_sender: Option<Sender<WorkItem>>,
    handles: Vec<JoinHandle<()>>,
    threads: usize,
    logger: Arc<dyn Logger>,
}

impl WorkerPool {
    /// Spawn the worker threads.
    ///
    /// # Errors
    ///
    /// Returns `PyramidError::Worker` if a thread cannot be spawned.
    pub fn new(
        config: PoolConfig,
        ops: Arc<dyn ImageOps>,
        compressor: Arc<dyn TileCompressor>,
        logger: Arc<dyn Logger>,
    ) -> PyramidResult<Self> {
        let threads = config.threads.max(1);
        let (work_sender, work_receiver) = mpsc::channel::<WorkItem>();
        let work_receiver = Arc::new(Mutex::new(work_receiver));

        log_info!(
            logger,
            "Starting worker pool with {} threads (image backend: {}, compression: {})",
            threads,
            ops.name(),
            compressor.name()
        );

        let runner = Arc::new(JobRunner::new(ops, compressor));
        let mut handles = Vec::with_capacity(threads);
        for i in 0..threads {
            let runner = Arc::clone(&runner);
            let work_receiver = Arc::clone(&work_receiver);
            let worker_logger = Arc::clone(&logger);

            let handle = thread::Builder::new()
                .name(format!("pyramid-worker-{}", i))
                .spawn(move || Self::worker_loop(runner, work_receiver, worker_logger))
                .map_err(|e| PyramidError::Worker(format!("failed to spawn worker {}: {}", i, e)))?;
            handles.push(handle);
        }

        Ok(Self {
            work_sender: Some(work_sender),
            handles,
            threads,
            logger,
        })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Worker thread loop. Exits when the work queue is closed.
    fn worker_loop(
        runner: Arc<JobRunner>,
        work_receiver: Arc<Mutex<Receiver<WorkItem>>>,
        logger: Arc<dyn Logger>,
    ) {
        loop {
            let work = {
                let receiver = work_receiver
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                receiver.recv()
            };

            let Ok(item) = work else {
                break;
            };

            log_debug!(
                logger,
                "Worker running {} job for tile {} at zoom {}",
                item.job.kind(),
                item.job.coord(),
                item.job.zoom()
            );

            let result = panic::catch_unwind(AssertUnwindSafe(|| runner.run(&item.job)))
                .unwrap_or_else(|payload| {
                    Err(PyramidError::Worker(format!(
                        "job panicked: {}",
                        panic_message(payload.as_ref())
                    )))
                });

            let report = JobReport::for_job(&item.job, result);
            // The submitter may have stopped listening; nothing to do then
            let _ = item.reply.send((item.index, report));
        }
    }

    /// Run a batch of jobs and block until every one has reported.
    ///
    /// Reports are returned in the same order as `jobs`. Individual job
    /// failures are carried in each report's `result`; a batch never fails
    /// as a whole.
    pub fn run_batch(&self, jobs: Vec<Job>) -> Vec<JobReport> {
        let total = jobs.len();
        if total == 0 {
            return Vec::new();
        }

        let keys: Vec<(JobKind, i32, TileCoord)> = jobs
            .iter()
            .map(|job| (job.kind(), job.zoom(), job.coord()))
            .collect();
        let mut slots: Vec<Option<JobReport>> = (0..total).map(|_| None).collect();

        let (reply_sender, reply_receiver) = mpsc::channel();
        let mut submitted = 0;
        if let Some(sender) = &self.work_sender {
            for (index, job) in jobs.into_iter().enumerate() {
                let item = WorkItem {
                    index,
                    job,
                    reply: reply_sender.clone(),
                };
                if sender.send(item).is_err() {
                    break;
                }
                submitted += 1;
            }
        }
        drop(reply_sender);

        for _ in 0..submitted {
            match reply_receiver.recv() {
                Ok((index, report)) => slots[index] = Some(report),
                Err(_) => break,
            }
        }

        slots
            .into_iter()
            .zip(keys)
            .map(|(slot, (kind, zoom, coord))| {
                slot.unwrap_or_else(|| {
                    let reason = if self.work_sender.is_some() {
                        "worker exited before reporting"
                    } else {
                        "worker pool is shut down"
                    };
                    log_warn!(self.logger, "Job for tile {} at zoom {}: {}", coord, zoom, reason);
                    JobReport {
                        kind,
                        zoom,
                        coord,
                        result: Err(PyramidError::Worker(reason.to_string())),
                    }
                })
            })
            .collect()
    }

    /// Close the work queue and join every worker.
    ///
    /// Called automatically on drop. Later batches report every job as a
    /// `Worker` error.
    pub fn shutdown(&mut self) {
        if self.work_sender.take().is_none() {
            return;
        }
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                log_warn!(self.logger, "Worker thread exited with a panic");
            }
        }
        log_debug!(self.logger, "Worker pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
