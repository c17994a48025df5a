//! Continuous month index and inclusive month ranges.

use super::error::CatalogError;
use std::fmt;

/// A calendar month stored as `year * 12 + (month - 1)`, so a range of months
/// is a plain integer span and splitting it across workers is integer math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateMonth(u32);

/// First month held by the archive (January 1979).
pub const ARCHIVE_FIRST: DateMonth = DateMonth(1979 * 12);
/// Last month held by the archive (December 2009).
pub const ARCHIVE_LAST: DateMonth = DateMonth(2009 * 12 + 11);

impl DateMonth {
    /// Builds a month from a calendar pair. Returns `None` if `month` is not in `1..=12`.
    pub fn new(year: u32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(DateMonth(year.checked_mul(12)?.checked_add(month - 1)?))
    }

    pub fn year(self) -> u32 {
        self.0 / 12
    }

    /// Calendar month in `1..=12`.
    pub fn month(self) -> u32 {
        self.0 % 12 + 1
    }

    /// Archive date code: year followed by the zero-padded month (`197910`).
    pub fn date_code(self) -> String {
        format!("{}{:02}", self.year(), self.month())
    }

    /// The month `n` months after this one.
    pub fn offset(self, n: u32) -> Self {
        DateMonth(self.0.saturating_add(n))
    }
}

impl fmt::Display for DateMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.month(), self.year())
    }
}

/// Parses a `MM-YYYY` argument into `(month, year)` without range checks.
/// Out-of-range values are left for [`clamp_to_archive`].
pub fn parse_month_year(s: &str) -> Result<(u32, u32), CatalogError> {
    let invalid = || CatalogError::InvalidDate(s.to_string());
    let (month, year) = s.trim().split_once('-').ok_or_else(invalid)?;
    let month = month.trim().parse::<u32>().map_err(|_| invalid())?;
    let year = year.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok((month, year))
}

/// Clamps a possibly out-of-range `(month, year)` into the archive.
///
/// The month is first forced into `1..=12`, then the whole month index is
/// clamped to `[ARCHIVE_FIRST, ARCHIVE_LAST]`, so `06-1975` becomes `01-1979`
/// and `03-2015` becomes `12-2009`.
pub fn clamp_to_archive(month: u32, year: u32) -> DateMonth {
    let month = month.clamp(1, 12);
    let index = year.saturating_mul(12).saturating_add(month - 1);
    DateMonth(index.clamp(ARCHIVE_FIRST.0, ARCHIVE_LAST.0))
}

/// Inclusive range of months `[start, end]`; never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    start: DateMonth,
    end: DateMonth,
}

impl MonthRange {
    pub fn new(start: DateMonth, end: DateMonth) -> Result<Self, CatalogError> {
        if start > end {
            return Err(CatalogError::EmptyRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(MonthRange { start, end })
    }

    /// The whole archive, `01-1979 ..= 12-2009`.
    pub fn archive() -> Self {
        MonthRange {
            start: ARCHIVE_FIRST,
            end: ARCHIVE_LAST,
        }
    }

    pub fn start(&self) -> DateMonth {
        self.start
    }

    pub fn end(&self) -> DateMonth {
        self.end
    }

    /// Number of months, counting both ends (`start == end` is one month).
    pub fn len(&self) -> u32 {
        self.end.0 - self.start.0 + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = DateMonth> {
        (self.start.0..=self.end.0).map(DateMonth)
    }
}
