//! Default command – run the batch with a progress bar.

use anyhow::Result;
use hindcast_core::catalog::Resolver;
use hindcast_core::scheduler::{self, BatchPlan, RunOptions};

use crate::cli::progress_bar::BarSink;

/// Runs the batch to completion. Per-file failures are reported but do not make this fail.
pub async fn run_download(plan: BatchPlan, resolver: Resolver, options: RunOptions) -> Result<()> {
    let summary = scheduler::run_batch(plan, resolver, options, BarSink::new()).await?;
    let stats = &summary.stats;

    println!(
        "{} month(s), {} worker(s): {} downloaded ({:.1} MiB at {:.1} MiB/s), {} already present, {} failed, {:.0}s",
        summary.months,
        summary.workers,
        stats.downloaded,
        stats.bytes_downloaded as f64 / 1_048_576.0,
        stats.bytes_per_sec() / 1_048_576.0,
        stats.skipped,
        stats.failed,
        stats.elapsed_secs
    );

    if !summary.failures.is_empty() {
        eprintln!("{} file(s) could not be downloaded:", summary.failures.len());
        for failed in &summary.failures {
            eprintln!("  {}  ({})", failed.url, failed.reason);
        }
        tracing::warn!("batch finished with {} failed file(s)", summary.failures.len());
    }
    Ok(())
}
