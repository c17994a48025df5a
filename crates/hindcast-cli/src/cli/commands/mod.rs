//! CLI command handlers.

mod download;
mod dry_run;

pub use download::run_download;
pub use dry_run::run_dry_run;
