//! Hand-maintained mapping from human-readable names to archive path codes.

use super::error::CatalogError;
use std::fmt;
use std::str::FromStr;

/// A model grid region of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Alaska,
    AlaskaCoastal,
    EastUsCoastal,
    EastUs,
    Global,
    Mediterranean,
    NorthSeaCoastal,
    NorthSea,
    NwIndianOcean,
    AustraliaCoastal,
    Australia,
    PacificIslands,
    WestUsCoastal,
    WestUs,
}

/// Regions whose partition files live under a different code than their grid files.
const PARTITION_OVERRIDES: &[(Region, &str)] = &[(Region::Global, "glo_30mext")];

impl Region {
    pub const ALL: [Region; 14] = [
        Region::Alaska,
        Region::AlaskaCoastal,
        Region::EastUsCoastal,
        Region::EastUs,
        Region::Global,
        Region::Mediterranean,
        Region::NorthSeaCoastal,
        Region::NorthSea,
        Region::NwIndianOcean,
        Region::AustraliaCoastal,
        Region::Australia,
        Region::PacificIslands,
        Region::WestUsCoastal,
        Region::WestUs,
    ];

    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Region::Alaska => "alaska",
            Region::AlaskaCoastal => "alaska-coastal",
            Region::EastUsCoastal => "east-us-coastal",
            Region::EastUs => "east-us",
            Region::Global => "global",
            Region::Mediterranean => "mediterranean",
            Region::NorthSeaCoastal => "north-sea-coastal",
            Region::NorthSea => "north-sea",
            Region::NwIndianOcean => "nw-indian-ocean",
            Region::AustraliaCoastal => "australia-coastal",
            Region::Australia => "australia",
            Region::PacificIslands => "pacific-islands",
            Region::WestUsCoastal => "west-us-coastal",
            Region::WestUs => "west-us",
        }
    }

    /// Path code of the region's grid (`.grb2`) files.
    pub fn grid_code(self) -> &'static str {
        match self {
            Region::Alaska => "ak_4m",
            Region::AlaskaCoastal => "ak_10m",
            Region::EastUsCoastal => "ecg_4m",
            Region::EastUs => "ecg_10m",
            Region::Global => "glo_30m",
            Region::Mediterranean => "med_10m",
            Region::NorthSeaCoastal => "nsb_4m",
            Region::NorthSea => "nsb_10m",
            Region::NwIndianOcean => "nwio_10m",
            Region::AustraliaCoastal => "oz_4m",
            Region::Australia => "oz_10m",
            Region::PacificIslands => "pi_10m",
            Region::WestUsCoastal => "wc_4m",
            Region::WestUs => "wc_10m",
        }
    }

    /// Path code of the region's partition files; the grid code unless overridden.
    pub fn partition_code(self) -> &'static str {
        PARTITION_OVERRIDES
            .iter()
            .find(|(region, _)| *region == self)
            .map(|(_, code)| *code)
            .unwrap_or_else(|| self.grid_code())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| CatalogError::UnknownRegion(s.to_string()))
    }
}

/// A gridded field available for every region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    WaveHeight,
    WindSpeeds,
    WavePeriod,
    WaveDirection,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::WaveHeight,
        Feature::WindSpeeds,
        Feature::WavePeriod,
        Feature::WaveDirection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::WaveHeight => "wave-height",
            Feature::WindSpeeds => "wind-speeds",
            Feature::WavePeriod => "wave-period",
            Feature::WaveDirection => "wave-direction",
        }
    }

    /// File-suffix code used in grid file names.
    pub fn code(self) -> &'static str {
        match self {
            Feature::WaveHeight => "hs",
            Feature::WindSpeeds => "wind",
            Feature::WavePeriod => "tp",
            Feature::WaveDirection => "dp",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| CatalogError::UnknownFeature(s.to_string()))
    }
}

/// Observed buoys or model virtual stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationKind {
    Buoys,
    Virtual,
}

impl StationKind {
    pub const ALL: [StationKind; 2] = [StationKind::Buoys, StationKind::Virtual];

    /// Directory name, both remote and local, and the file-name prefix.
    pub fn code(self) -> &'static str {
        match self {
            StationKind::Buoys => "buoys",
            StationKind::Virtual => "virtual",
        }
    }
}

/// Station archive flavor: partitions, spectra, or WMO bulletins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationSubtype {
    Part,
    Spec,
    Wmo,
}

impl StationSubtype {
    pub const ALL: [StationSubtype; 3] = [StationSubtype::Part, StationSubtype::Spec, StationSubtype::Wmo];

    pub fn code(self) -> &'static str {
        match self {
            StationSubtype::Part => "part",
            StationSubtype::Spec => "spec",
            StationSubtype::Wmo => "wmo",
        }
    }
}
