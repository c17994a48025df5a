//! CLI for the hindcast archive downloader.

mod commands;
mod progress_bar;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use hindcast_core::catalog::{
    clamp_to_archive, parse_month_year, CatalogError, DateMonth, Feature, MonthRange, Region, Resolver,
};
use hindcast_core::config;
use hindcast_core::scheduler::{BatchPlan, FileKinds, RunOptions};
use std::path::PathBuf;

use commands::{run_download, run_dry_run};

/// Bulk-download the NOPP phase-2 multi-grid wave hindcast, one directory per month.
#[derive(Debug, Parser)]
#[command(name = "hindcast")]
#[command(about = "Bulk downloader for the NOPP phase-2 wave hindcast archive", long_about = None)]
pub struct Cli {
    /// Inclusive start date MM-YYYY (min 01-1979, max 12-2009; out-of-range dates are clamped).
    #[arg(short = 's', long, value_name = "MM-YYYY", default_value = "01-1979", value_parser = parse_month_arg)]
    pub start_date: DateMonth,

    /// Inclusive end date MM-YYYY (min 01-1979, max 12-2009; out-of-range dates are clamped).
    #[arg(short = 'e', long, value_name = "MM-YYYY", default_value = "12-2009", value_parser = parse_month_arg)]
    pub end_date: DateMonth,

    /// Directory the month tree is written to (default: `data_dir` from config, usually ./data).
    #[arg(short = 'p', long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Regions to download (default: all). Any of: alaska, alaska-coastal, australia,
    /// australia-coastal, east-us, east-us-coastal, global, mediterranean, north-sea,
    /// north-sea-coastal, nw-indian-ocean, pacific-islands, west-us, west-us-coastal.
    #[arg(short = 'r', long, value_name = "REGION", num_args = 1.., value_parser = parse_region)]
    pub regions: Vec<Region>,

    /// Features to download (default: all). Any of: wave-height, wind-speeds, wave-period, wave-direction.
    #[arg(short = 'f', long, value_name = "FEATURE", num_args = 1.., value_parser = parse_feature)]
    pub features: Vec<Feature>,

    /// Skip the gridded data files.
    #[arg(long)]
    pub no_data: bool,

    /// Also download the monthly partition file of each region.
    #[arg(long)]
    pub partition_files: bool,

    /// Also download the six buoy / virtual-station archives of each month.
    #[arg(long)]
    pub buoy_files: bool,

    /// Number of parallel workers (default: available CPUs; never more than the month count).
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Print the files that would be fetched and exit.
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_month_arg(s: &str) -> Result<DateMonth, CatalogError> {
    let (month, year) = parse_month_year(s)?;
    Ok(clamp_to_archive(month, year))
}

fn parse_region(s: &str) -> Result<Region, CatalogError> {
    s.parse()
}

fn parse_feature(s: &str) -> Result<Feature, CatalogError> {
    s.parse()
}

impl Cli {
    pub fn file_kinds(&self) -> FileKinds {
        FileKinds {
            grids: !self.no_data,
            partitions: self.partition_files,
            stations: self.buoy_files,
        }
    }

    /// Builds the batch; empty region/feature lists mean "all".
    pub fn batch_plan(&self) -> Result<BatchPlan, CatalogError> {
        let range = MonthRange::new(self.start_date, self.end_date)?;
        let regions = if self.regions.is_empty() {
            Region::ALL.to_vec()
        } else {
            self.regions.clone()
        };
        let features = if self.features.is_empty() {
            Feature::ALL.to_vec()
        } else {
            self.features.clone()
        };
        Ok(BatchPlan::new(range, regions, features, self.file_kinds()))
    }

    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let plan = match cli.batch_plan() {
            Ok(plan) => plan,
            Err(e) => Cli::command().error(ErrorKind::ArgumentConflict, e).exit(),
        };
        let root = cli.path.clone().unwrap_or_else(|| cfg.data_dir.clone());
        let resolver = Resolver::new(&cfg.base_url, root);

        if plan.expected_operations() == 0 {
            println!("Nothing to download: every file kind is disabled.");
            return Ok(());
        }
        if cli.dry_run {
            run_dry_run(&plan, &resolver);
            return Ok(());
        }

        let mut options = RunOptions::from_config(&cfg);
        if cli.workers.is_some() {
            options.workers = cli.workers;
        }
        run_download(plan, resolver, options).await
    }
}

#[cfg(test)]
mod tests;
