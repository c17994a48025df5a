//! Work units and month-range partitioning.

use crate::catalog::DateMonth;

/// A contiguous run of months assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkUnit {
    /// First month (inclusive).
    pub start: DateMonth,
    /// Number of months; 0 for an idle worker.
    pub months: u32,
}

impl WorkUnit {
    pub fn is_empty(&self) -> bool {
        self.months == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = DateMonth> {
        let start = self.start;
        (0..self.months).map(move |i| start.offset(i))
    }
}

/// Splits `total_months` starting at `start` into `worker_count` contiguous units.
///
/// Units are as equal as possible: the first `total % workers` units get one
/// extra month, so sizes differ by at most one and larger units come first.
/// When `total_months < worker_count` the trailing units are empty.
/// Returns an empty vec if `total_months` is 0 or `worker_count` is 0.
pub fn partition(start: DateMonth, total_months: u32, worker_count: usize) -> Vec<WorkUnit> {
    if total_months == 0 || worker_count == 0 {
        return Vec::new();
    }

    let workers = worker_count as u64;
    let base = total_months as u64 / workers;
    let remainder = total_months as u64 % workers;

    let mut out = Vec::with_capacity(worker_count);
    let mut offset = 0u32;

    for i in 0..workers {
        let len = (base + if i < remainder { 1 } else { 0 }) as u32;
        out.push(WorkUnit {
            start: start.offset(offset),
            months: len,
        });
        offset += len;
    }

    out
}

/// Number of workers for a batch: the requested count (or the machine's
/// available parallelism), capped at the month count, at least 1.
pub fn worker_count(requested: Option<usize>, total_months: u32) -> usize {
    let wanted = requested.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    wanted.min(total_months as usize).max(1)
}
