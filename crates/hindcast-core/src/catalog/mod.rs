//! Archive catalog: month indexing, region/feature codes, and URL/path resolution.
//!
//! Everything here is pure: the same inputs always resolve to the same remote
//! URL and the same local destination, which is what makes skip-if-exists
//! checks in the fetcher correct across re-runs.

mod error;
mod month;
mod names;
mod resolve;

pub use error::CatalogError;
pub use month::{clamp_to_archive, parse_month_year, DateMonth, MonthRange, ARCHIVE_FIRST, ARCHIVE_LAST};
pub use names::{Feature, Region, StationKind, StationSubtype};
pub use resolve::{DownloadRequest, Resolver};
