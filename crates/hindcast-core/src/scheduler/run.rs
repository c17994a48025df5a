//! Batch orchestration: plan, spawn workers, report progress, join.
//!
//! Phases only move forward:
//! `Initializing → Running → Draining → Done`. There is no cancellation path;
//! a batch always runs every worker to completion.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Resolver;
use crate::config::{HindcastConfig, HttpConfig};
use crate::fetch::Fetcher;

use super::partition::{partition, worker_count};
use super::plan::BatchPlan;
use super::progress::{run_reporter, FailedFetch, ProgressCounter, ProgressSink, ProgressStats, SIGNAL_BUFFER};
use super::worker::{run_worker, WorkerReport};

/// Lifecycle of one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Validating input, creating the root directory, partitioning.
    Initializing,
    /// Workers fetching, reporter sampling the counter.
    Running,
    /// Workers joined; reporter flushing the last delta.
    Draining,
    Done,
}

impl RunPhase {
    fn advance(self) -> Self {
        let next = match self {
            RunPhase::Initializing => RunPhase::Running,
            RunPhase::Running => RunPhase::Draining,
            RunPhase::Draining | RunPhase::Done => RunPhase::Done,
        };
        tracing::debug!(from = ?self, to = ?next, "batch phase");
        next
    }
}

/// Execution knobs for a batch (from config, overridable on the command line).
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub http: HttpConfig,
    /// Worker count override; None = available parallelism.
    pub workers: Option<usize>,
    /// Longest wait between progress samples.
    pub progress_interval: Duration,
}

impl RunOptions {
    pub fn from_config(cfg: &HindcastConfig) -> Self {
        Self {
            http: cfg.http.clone(),
            workers: cfg.workers,
            progress_interval: cfg.progress_interval(),
        }
    }
}

/// Result of a finished batch. Failed files are listed, not raised.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub months: u32,
    pub workers: usize,
    pub expected: u64,
    pub stats: ProgressStats,
    pub failures: Vec<FailedFetch>,
    /// Per-worker reports, ordered by unit start month.
    pub reports: Vec<WorkerReport>,
}

/// Runs `plan` to completion and returns what happened.
///
/// Only setup problems (e.g. the download root cannot be created) and a
/// crashed worker task are errors; individual file failures end up in
/// [`BatchSummary::failures`].
pub async fn run_batch<S: ProgressSink>(
    plan: BatchPlan,
    resolver: Resolver,
    options: RunOptions,
    mut sink: S,
) -> Result<BatchSummary> {
    let mut phase = RunPhase::Initializing;

    std::fs::create_dir_all(resolver.root())
        .with_context(|| format!("create download dir {}", resolver.root().display()))?;

    let range = plan.range();
    let months = range.len();
    let expected = plan.expected_operations();
    let workers = worker_count(options.workers, months);
    let units = partition(range.start(), months, workers);
    tracing::info!(
        start = %range.start(),
        end = %range.end(),
        months,
        workers,
        expected,
        root = %resolver.root().display(),
        "starting batch"
    );

    let counter = Arc::new(ProgressCounter::new(expected));
    let (signal_tx, signal_rx) = tokio::sync::mpsc::channel(SIGNAL_BUFFER);
    let fetcher = Fetcher::new(options.http.clone(), Arc::clone(&counter)).with_signal(signal_tx);
    let plan = Arc::new(plan);
    let resolver = Arc::new(resolver);

    sink.start(expected);
    phase = phase.advance();
    let reporter = tokio::spawn(run_reporter(
        signal_rx,
        Arc::clone(&counter),
        sink,
        options.progress_interval,
    ));

    let mut join_set = tokio::task::JoinSet::new();
    for (id, unit) in units.into_iter().enumerate() {
        let plan = Arc::clone(&plan);
        let resolver = Arc::clone(&resolver);
        let fetcher = fetcher.clone();
        join_set.spawn_blocking(move || run_worker(id, unit, &plan, &resolver, &fetcher));
    }
    // The reporter stops once the last fetcher (and its signal sender) is gone.
    drop(fetcher);

    let mut reports = Vec::with_capacity(workers);
    let mut join_error = None;
    while let Some(res) = join_set.join_next().await {
        match res {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::error!("worker task failed: {}", e);
                join_error.get_or_insert(e);
            }
        }
    }

    phase = phase.advance();
    reporter.await.context("progress reporter join")?;
    phase = phase.advance();
    debug_assert_eq!(phase, RunPhase::Done);

    if let Some(e) = join_error {
        return Err(anyhow::anyhow!("worker task join: {}", e));
    }

    reports.sort_by_key(|r| r.unit.start);
    let stats = counter.snapshot();
    tracing::info!(
        completed = stats.completed,
        downloaded = stats.downloaded,
        skipped = stats.skipped,
        failed = stats.failed,
        bytes = stats.bytes_downloaded,
        "batch finished"
    );

    Ok(BatchSummary {
        months,
        workers,
        expected,
        failures: counter.failures(),
        stats,
        reports,
    })
}
