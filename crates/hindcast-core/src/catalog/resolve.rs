//! Resolution of (month, region, feature) into a remote URL and a local path.
//!
//! The local tree mirrors the archive's month directories:
//! `<root>/<YYYYMM>/gribs/`, `<root>/<YYYYMM>/partitions/`,
//! `<root>/<YYYYMM>/points/{buoys,virtual}/`.

use super::month::DateMonth;
use super::names::{Feature, Region, StationKind, StationSubtype};
use std::path::{Path, PathBuf};

/// One file to fetch: where it lives remotely and where it goes locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub destination: PathBuf,
}

/// Maps catalog coordinates onto the archive base URL and a local root directory.
#[derive(Debug, Clone)]
pub struct Resolver {
    base_url: String,
    root: PathBuf,
}

impl Resolver {
    /// `base_url` is used as a prefix; a trailing `/` is added if missing.
    pub fn new(base_url: &str, root: impl Into<PathBuf>) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Resolver {
            base_url,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Gridded field file for one region and feature.
    pub fn grid(&self, month: DateMonth, region: Region, feature: Feature) -> DownloadRequest {
        let date = month.date_code();
        let file = format!(
            "multi_reanal.{}.{}.{}.grb2",
            region.grid_code(),
            feature.code(),
            date
        );
        self.request(&date, "gribs", file)
    }

    /// Monthly bulk spectral partition file for one region.
    pub fn partition(&self, month: DateMonth, region: Region) -> DownloadRequest {
        let date = month.date_code();
        let file = format!("multi_reanal.partition.{}.{}.gz", region.partition_code(), date);
        self.request(&date, "partitions", file)
    }

    /// Buoy or virtual-station archive.
    pub fn station(&self, month: DateMonth, kind: StationKind, subtype: StationSubtype) -> DownloadRequest {
        let date = month.date_code();
        let file = format!("multi_reanal.{}_{}.{}.tar.gz", kind.code(), subtype.code(), date);
        self.request(&date, &format!("points/{}", kind.code()), file)
    }

    fn request(&self, date: &str, dir: &str, file: String) -> DownloadRequest {
        let url = format!("{}{}/{}/{}", self.base_url, date, dir, file);
        let mut destination = self.root.join(date);
        for part in dir.split('/') {
            destination.push(part);
        }
        destination.push(file);
        DownloadRequest { url, destination }
    }
}
