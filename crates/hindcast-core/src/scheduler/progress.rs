//! Shared completion counter and the reporting loop that drives a display.
//!
//! Workers record one completion per fetch (downloaded, skipped, or failed)
//! and nudge the reporter through a bounded channel. The reporter also wakes
//! on a fixed interval, so a full channel or a slow transfer never stalls the
//! display; the counter, not the signals, is the source of truth.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::fetch::FetchOutcome;

/// Capacity of the "completed" signal channel between fetchers and the reporter.
pub(crate) const SIGNAL_BUFFER: usize = 64;

/// A fetch that failed, kept for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFetch {
    pub url: String,
    pub reason: String,
}

/// Counts completed fetch operations across all workers.
///
/// Shared by `Arc`; every field is updated atomically (the failure list under a mutex),
/// so concurrent increments are never lost.
#[derive(Debug)]
pub struct ProgressCounter {
    expected: u64,
    completed: AtomicU64,
    downloaded: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    bytes: AtomicU64,
    failures: Mutex<Vec<FailedFetch>>,
    started: Instant,
}

impl ProgressCounter {
    pub fn new(expected: u64) -> Self {
        Self {
            expected,
            completed: AtomicU64::new(0),
            downloaded: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            failures: Mutex::new(Vec::new()),
            started: Instant::now(),
        }
    }

    /// Adds one completed operation; returns the new total.
    pub fn increment(&self) -> u64 {
        self.completed.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Tallies `outcome` and counts it as exactly one completed operation.
    pub fn record(&self, url: &str, outcome: &FetchOutcome) -> u64 {
        match outcome {
            FetchOutcome::Downloaded { bytes } => {
                self.downloaded.fetch_add(1, Ordering::Relaxed);
                self.bytes.fetch_add(*bytes, Ordering::Relaxed);
            }
            FetchOutcome::Skipped => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
            FetchOutcome::Failed(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                self.failures
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(FailedFetch {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
            }
        }
        self.increment()
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> ProgressStats {
        ProgressStats {
            completed: self.completed(),
            expected: self.expected,
            downloaded: self.downloaded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            bytes_downloaded: self.bytes.load(Ordering::Relaxed),
            elapsed_secs: self.started.elapsed().as_secs_f64(),
        }
    }

    /// Failed URLs recorded so far, in completion order.
    pub fn failures(&self) -> Vec<FailedFetch> {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Snapshot of batch progress (CLI-friendly).
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressStats {
    /// Operations finished, whatever their outcome.
    pub completed: u64,
    /// Operations the batch will perform in total.
    pub expected: u64,
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
    pub bytes_downloaded: u64,
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_downloaded as f64 / self.elapsed_secs
    }
}

/// Where the reporter sends progress: a terminal bar, a log, a test recorder.
pub trait ProgressSink: Send + 'static {
    fn start(&mut self, _expected: u64) {}

    /// `delta` operations finished since the previous call.
    fn advance(&mut self, delta: u64, stats: &ProgressStats);

    fn finish(&mut self, _stats: &ProgressStats) {}
}

/// Discards all progress.
impl ProgressSink for () {
    fn advance(&mut self, _delta: u64, _stats: &ProgressStats) {}
}

/// Samples `counter` on every signal or every `interval`, whichever comes first,
/// and advances `sink` by the delta since the last sample. Returns once every
/// signal sender is dropped (all workers done), after flushing the final delta.
pub(super) async fn run_reporter<S: ProgressSink>(
    mut signals: tokio::sync::mpsc::Receiver<()>,
    counter: Arc<ProgressCounter>,
    mut sink: S,
    interval: Duration,
) -> S {
    let mut reported = 0u64;
    loop {
        let closed = match tokio::time::timeout(interval, signals.recv()).await {
            Ok(Some(())) => false,
            Ok(None) => true,
            Err(_elapsed) => false,
        };
        let now = counter.completed();
        if now > reported {
            sink.advance(now - reported, &counter.snapshot());
            reported = now;
        }
        if closed {
            break;
        }
    }
    sink.finish(&counter.snapshot());
    sink
}
