//! Worker pool for pyramid jobs.
//!
//! Jobs come in two kinds: compressing a changed source tile into level 0,
//! and combining up to four tiles of one level into their parent on the next
//! coarser level. The pool runs a batch of either kind across a fixed set of
//! threads and returns one [`JobReport`] per job.

mod job;
mod runner;
mod worker;

pub use job::{ChildSlot, CompressJob, Job, JobKind, JobOutcome, JobReport, QuadrantJob};
pub use runner::JobRunner;
pub use worker::{PoolConfig, WorkerPool};
