//! What a batch fetches: month range, regions, features, and file kinds.

use crate::catalog::{DateMonth, DownloadRequest, Feature, MonthRange, Region, Resolver, StationKind, StationSubtype};

/// Station files per month: {buoys, virtual} × {part, spec, wmo}.
pub const STATION_FILES_PER_MONTH: u64 = 6;

/// Which file families to fetch for every month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileKinds {
    /// Grid files, one per region × feature.
    pub grids: bool,
    /// Partition files, one per region.
    pub partitions: bool,
    /// The six station archives.
    pub stations: bool,
}

impl Default for FileKinds {
    fn default() -> Self {
        Self {
            grids: true,
            partitions: false,
            stations: false,
        }
    }
}

/// Immutable description of a batch, shared read-only by all workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    range: MonthRange,
    regions: Vec<Region>,
    features: Vec<Feature>,
    kinds: FileKinds,
}

fn dedup_in_order<T: PartialEq + Copy>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

impl BatchPlan {
    /// Repeated regions or features are dropped (first occurrence wins).
    pub fn new(
        range: MonthRange,
        regions: impl IntoIterator<Item = Region>,
        features: impl IntoIterator<Item = Feature>,
        kinds: FileKinds,
    ) -> Self {
        Self {
            range,
            regions: dedup_in_order(regions),
            features: dedup_in_order(features),
            kinds,
        }
    }

    pub fn range(&self) -> MonthRange {
        self.range
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn kinds(&self) -> FileKinds {
        self.kinds
    }

    pub fn operations_per_month(&self) -> u64 {
        let regions = self.regions.len() as u64;
        let mut ops = 0;
        if self.kinds.grids {
            ops += regions * self.features.len() as u64;
        }
        if self.kinds.partitions {
            ops += regions;
        }
        if self.kinds.stations {
            ops += STATION_FILES_PER_MONTH;
        }
        ops
    }

    /// Total fetch operations the batch performs (downloads, skips and failures alike).
    pub fn expected_operations(&self) -> u64 {
        self.range.len() as u64 * self.operations_per_month()
    }

    /// Requests for one month: grids, then partitions, then stations.
    pub fn requests_for(&self, month: DateMonth, resolver: &Resolver) -> Vec<DownloadRequest> {
        let mut out = Vec::with_capacity(self.operations_per_month() as usize);
        if self.kinds.grids {
            for &region in &self.regions {
                for &feature in &self.features {
                    out.push(resolver.grid(month, region, feature));
                }
            }
        }
        if self.kinds.partitions {
            for &region in &self.regions {
                out.push(resolver.partition(month, region));
            }
        }
        if self.kinds.stations {
            for kind in StationKind::ALL {
                for subtype in StationSubtype::ALL {
                    out.push(resolver.station(month, kind, subtype));
                }
            }
        }
        out
    }

    /// Every request of the batch in month order.
    pub fn requests<'a>(&'a self, resolver: &'a Resolver) -> impl Iterator<Item = DownloadRequest> + 'a {
        self.range
            .iter()
            .flat_map(move |month| self.requests_for(month, resolver))
    }
}
