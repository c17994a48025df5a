//! `hindcast --dry-run` – list what a batch would fetch.

use hindcast_core::catalog::Resolver;
use hindcast_core::scheduler::BatchPlan;

pub fn run_dry_run(plan: &BatchPlan, resolver: &Resolver) {
    let range = plan.range();
    let mut present = 0u64;
    for request in plan.requests(resolver) {
        let marker = if request.destination.exists() {
            present += 1;
            "skip"
        } else {
            "get "
        };
        println!("{}  {}  ->  {}", marker, request.url, request.destination.display());
    }
    println!(
        "{} file(s) over {} month(s) ({} to {}), {} already present.",
        plan.expected_operations(),
        range.len(),
        range.start(),
        range.end(),
        present
    );
}
