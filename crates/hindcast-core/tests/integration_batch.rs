//! Integration test: local archive server, full batch runs through the scheduler.
//!
//! Checks the files land in the month tree, that a second run only skips, and
//! that missing remote files are counted without stopping the batch.

mod common;

use hindcast_core::catalog::{DateMonth, Feature, MonthRange, Region, Resolver};
use hindcast_core::config::HttpConfig;
use hindcast_core::fetch::{FetchOutcome, Fetcher};
use hindcast_core::scheduler::{self, BatchPlan, FileKinds, ProgressCounter, ProgressSink, ProgressStats, RunOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

fn options(workers: usize) -> RunOptions {
    RunOptions {
        http: HttpConfig {
            connect_timeout_secs: 5,
            timeout_secs: 30,
            ..HttpConfig::default()
        },
        workers: Some(workers),
        progress_interval: Duration::from_millis(20),
    }
}

fn month(year: u32, m: u32) -> DateMonth {
    DateMonth::new(year, m).unwrap()
}

fn no_part_files(dir: &Path) -> bool {
    fn walk(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().flatten().all(|e| {
            let p = e.path();
            if p.is_dir() {
                walk(&p)
            } else {
                !p.to_string_lossy().ends_with(".part")
            }
        })
    }
    walk(dir)
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<(u64, u64, bool)>>);

impl ProgressSink for Recorder {
    fn start(&mut self, expected: u64) {
        self.0.lock().unwrap().0 = expected;
    }

    fn advance(&mut self, delta: u64, _stats: &ProgressStats) {
        self.0.lock().unwrap().1 += delta;
    }

    fn finish(&mut self, _stats: &ProgressStats) {
        self.0.lock().unwrap().2 = true;
    }
}

#[tokio::test]
async fn global_october_1979_downloads_then_skips() {
    let server = common::archive_server::start();
    let data = tempdir().unwrap();
    let oct = month(1979, 10);
    let kinds = FileKinds {
        grids: true,
        partitions: true,
        stations: false,
    };
    let plan = BatchPlan::new(MonthRange::new(oct, oct).unwrap(), [Region::Global], [Feature::WaveHeight], kinds);
    let resolver = Resolver::new(&server.base_url, data.path());

    let first = scheduler::run_batch(plan.clone(), resolver.clone(), options(4), ())
        .await
        .expect("first run");
    assert_eq!(first.months, 1);
    assert_eq!(first.workers, 1);
    assert_eq!(first.expected, 2);
    assert_eq!(first.stats.completed, 2);
    assert_eq!(first.stats.downloaded, 2);
    assert!(first.failures.is_empty());
    assert_eq!(server.hits(), 2);

    let mut paths = server.requested_paths();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "/archive/197910/gribs/multi_reanal.glo_30m.hs.197910.grb2".to_string(),
            "/archive/197910/partitions/multi_reanal.partition.glo_30mext.197910.gz".to_string(),
        ]
    );

    let grid = data.path().join("197910/gribs/multi_reanal.glo_30m.hs.197910.grb2");
    let part = data
        .path()
        .join("197910/partitions/multi_reanal.partition.glo_30mext.197910.gz");
    assert_eq!(
        std::fs::read(&grid).unwrap(),
        common::archive_server::body_for("/archive/197910/gribs/multi_reanal.glo_30m.hs.197910.grb2")
    );
    assert!(part.exists());
    assert!(no_part_files(data.path()));

    let second = scheduler::run_batch(plan, resolver, options(4), ())
        .await
        .expect("second run");
    assert_eq!(second.stats.completed, 2);
    assert_eq!(second.stats.skipped, 2);
    assert_eq!(second.stats.downloaded, 0);
    assert_eq!(server.hits(), 2, "second run must not touch the network");
}

#[tokio::test]
async fn missing_remote_file_is_counted_and_batch_completes() {
    let server = common::archive_server::start_with_missing(&["multi_reanal.wc_10m.tp.198002.grb2"]);
    let data = tempdir().unwrap();
    let start = month(1980, 1);
    let range = MonthRange::new(start, start.offset(2)).unwrap();
    let kinds = FileKinds {
        grids: true,
        partitions: false,
        stations: true,
    };
    let plan = BatchPlan::new(range, [Region::WestUs], [Feature::WavePeriod], kinds);
    let resolver = Resolver::new(&server.base_url, data.path());
    let recorder = Recorder::default();

    let summary = scheduler::run_batch(plan, resolver, options(2), recorder.clone())
        .await
        .expect("batch should not fail on a 404");

    assert_eq!(summary.expected, 3 * 7);
    assert_eq!(summary.stats.completed, 21);
    assert_eq!(summary.stats.failed, 1);
    assert_eq!(summary.stats.downloaded, 20);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].url.ends_with("198002/gribs/multi_reanal.wc_10m.tp.198002.grb2"));
    assert_eq!(summary.failures[0].reason, "HTTP 404");

    assert!(!data
        .path()
        .join("198002/gribs/multi_reanal.wc_10m.tp.198002.grb2")
        .exists());
    assert!(data
        .path()
        .join("198003/points/virtual/multi_reanal.virtual_spec.198003.tar.gz")
        .exists());
    assert!(data
        .path()
        .join("198001/points/buoys/multi_reanal.buoys_wmo.198001.tar.gz")
        .exists());
    assert!(no_part_files(data.path()));

    let seen = recorder.0.lock().unwrap();
    assert_eq!(seen.0, 21, "sink told the expected total");
    assert_eq!(seen.1, 21, "sink advanced by every completed operation");
    assert!(seen.2, "sink finished");
}

#[tokio::test]
async fn unwritable_month_fails_locally_and_other_months_download() {
    let server = common::archive_server::start();
    let data = tempdir().unwrap();
    // A plain file where the 1980-02 month directory belongs.
    std::fs::write(data.path().join("198002"), b"not a directory").unwrap();
    let start = month(1980, 1);
    let range = MonthRange::new(start, start.offset(2)).unwrap();
    let plan = BatchPlan::new(range, [Region::Global], [Feature::WaveHeight], FileKinds::default());
    let resolver = Resolver::new(&server.base_url, data.path());

    let summary = scheduler::run_batch(plan, resolver, options(3), ())
        .await
        .expect("a storage failure must not abort the batch");

    assert_eq!(summary.stats.completed, 3);
    assert_eq!(summary.stats.downloaded, 2);
    assert_eq!(summary.stats.failed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].url.ends_with("198002/gribs/multi_reanal.glo_30m.hs.198002.grb2"));
    assert!(summary.failures[0].reason.starts_with("storage: "));
    assert_eq!(server.hits(), 2, "the blocked month never reaches the network");
    assert!(data
        .path()
        .join("198001/gribs/multi_reanal.glo_30m.hs.198001.grb2")
        .exists());
    assert!(data
        .path()
        .join("198003/gribs/multi_reanal.glo_30m.hs.198003.grb2")
        .exists());
}

#[tokio::test]
async fn work_is_split_across_workers_without_overlap() {
    let server = common::archive_server::start();
    let data = tempdir().unwrap();
    let start = month(2009, 6);
    let range = MonthRange::new(start, start.offset(6)).unwrap();
    let plan = BatchPlan::new(range, [Region::Alaska], [Feature::WindSpeeds], FileKinds::default());
    let resolver = Resolver::new(&server.base_url, data.path());

    let summary = scheduler::run_batch(plan, resolver, options(3), ())
        .await
        .expect("batch");

    assert_eq!(summary.workers, 3);
    let sizes: Vec<u32> = summary.reports.iter().map(|r| r.unit.months).collect();
    assert_eq!(sizes, vec![3, 2, 2]);
    assert_eq!(summary.reports.iter().map(|r| r.attempted).sum::<u64>(), 7);
    assert_eq!(summary.stats.downloaded, 7);

    let mut paths = server.requested_paths();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 7, "every month fetched exactly once");
}

#[tokio::test]
async fn worker_count_never_exceeds_month_count() {
    let server = common::archive_server::start();
    let data = tempdir().unwrap();
    let start = month(1995, 2);
    let plan = BatchPlan::new(
        MonthRange::new(start, start.offset(1)).unwrap(),
        [Region::Mediterranean],
        [Feature::WaveDirection],
        FileKinds::default(),
    );
    let resolver = Resolver::new(&server.base_url, data.path());
    let summary = scheduler::run_batch(plan, resolver, options(16), ())
        .await
        .expect("batch");
    assert_eq!(summary.workers, 2);
    assert_eq!(summary.stats.completed, 2);
}

#[test]
fn fetching_twice_makes_one_network_call() {
    let server = common::archive_server::start();
    let data = tempdir().unwrap();
    let resolver = Resolver::new(&server.base_url, data.path());
    let request = resolver.grid(month(1979, 10), Region::PacificIslands, Feature::WaveHeight);

    let counter = Arc::new(ProgressCounter::new(2));
    let fetcher = Fetcher::new(HttpConfig::default(), Arc::clone(&counter));

    match fetcher.fetch(&request) {
        FetchOutcome::Downloaded { bytes } => {
            assert_eq!(bytes, common::archive_server::body_for("/archive/197910/gribs/multi_reanal.pi_10m.hs.197910.grb2").len() as u64)
        }
        other => panic!("expected download, got {:?}", other),
    }
    assert!(matches!(fetcher.fetch(&request), FetchOutcome::Skipped));
    assert_eq!(server.hits(), 1);
    assert_eq!(counter.completed(), 2);
}
