//! Batch scheduler.
//!
//! Splits the requested month range into contiguous, near-equal work units,
//! runs one blocking worker per unit, and drives a progress reporter from the
//! shared completion counter until every worker has finished:
//! plan → partition → workers (resolve → fetch → count) → reporter.

mod partition;
mod plan;
mod progress;
mod run;
mod worker;

pub use partition::{partition, worker_count, WorkUnit};
pub use plan::{BatchPlan, FileKinds, STATION_FILES_PER_MONTH};
pub use progress::{FailedFetch, ProgressCounter, ProgressSink, ProgressStats};
pub use run::{run_batch, BatchSummary, RunOptions, RunPhase};
pub use worker::{run_worker, WorkerReport};
