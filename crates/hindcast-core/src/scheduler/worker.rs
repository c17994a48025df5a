//! One worker: fetch every requested file of every month in its unit.

use crate::catalog::Resolver;
use crate::fetch::Fetcher;

use super::partition::WorkUnit;
use super::plan::BatchPlan;

/// What a worker did, for logs and the batch summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub unit: WorkUnit,
    /// Fetch operations performed (each counted once on the shared counter).
    pub attempted: u64,
    pub failed: u64,
}

/// Runs the unit to completion. Blocking; per-file failures are counted, never returned.
pub fn run_worker(id: usize, unit: WorkUnit, plan: &BatchPlan, resolver: &Resolver, fetcher: &Fetcher) -> WorkerReport {
    let _span = tracing::debug_span!("worker", id).entered();
    let mut report = WorkerReport {
        id,
        unit,
        attempted: 0,
        failed: 0,
    };
    if unit.is_empty() {
        tracing::debug!("no months assigned");
        return report;
    }
    tracing::debug!(start = %unit.start, months = unit.months, "worker started");

    for month in unit.iter() {
        for request in plan.requests_for(month, resolver) {
            let outcome = fetcher.fetch(&request);
            report.attempted += 1;
            if outcome.is_failed() {
                report.failed += 1;
            }
        }
    }

    tracing::debug!(attempted = report.attempted, failed = report.failed, "worker finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DateMonth, Feature, MonthRange, Region};
    use crate::config::HttpConfig;
    use crate::scheduler::{FileKinds, ProgressCounter};
    use std::sync::Arc;

    #[test]
    fn worker_skips_existing_files_for_its_months_only() {
        let dir = tempfile::tempdir().unwrap();
        let start = DateMonth::new(1980, 1).unwrap();
        let range = MonthRange::new(start, start.offset(3)).unwrap();
        let plan = BatchPlan::new(range, [Region::NorthSea], [Feature::WaveHeight, Feature::WavePeriod], FileKinds::default());
        let resolver = Resolver::new("http://127.0.0.1:1/", dir.path());

        // Pre-create the files of the unit's two months so no network is needed.
        let unit = WorkUnit {
            start: start.offset(1),
            months: 2,
        };
        for month in unit.iter() {
            for req in plan.requests_for(month, &resolver) {
                std::fs::create_dir_all(req.destination.parent().unwrap()).unwrap();
                std::fs::write(&req.destination, b"x").unwrap();
            }
        }

        let counter = Arc::new(ProgressCounter::new(plan.expected_operations()));
        let fetcher = Fetcher::new(HttpConfig::default(), Arc::clone(&counter));
        let report = run_worker(0, unit, &plan, &resolver, &fetcher);

        assert_eq!(report.attempted, 4);
        assert_eq!(report.failed, 0);
        let stats = counter.snapshot();
        assert_eq!(stats.completed, 4);
        assert_eq!(stats.skipped, 4);
    }

    #[test]
    fn empty_unit_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let start = DateMonth::new(1980, 1).unwrap();
        let plan = BatchPlan::new(MonthRange::new(start, start).unwrap(), Region::ALL, Feature::ALL, FileKinds::default());
        let resolver = Resolver::new("http://127.0.0.1:1/", dir.path());
        let counter = Arc::new(ProgressCounter::new(0));
        let fetcher = Fetcher::new(HttpConfig::default(), Arc::clone(&counter));
        let report = run_worker(3, WorkUnit { start, months: 0 }, &plan, &resolver, &fetcher);
        assert_eq!(report.attempted, 0);
        assert_eq!(counter.completed(), 0);
    }
}
