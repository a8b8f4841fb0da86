//! Reporting windows: the cache key of performance results.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A caller-selected reporting time range.
///
/// Windows are compared structurally. Two different windows that resolve to
/// the same dates on a given reference date are still distinct cache keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReportingWindow {
    /// The `n` years up to the reference date.
    LastYears(u32),
    /// The `n` days up to the reference date.
    LastDays(u32),
    /// From the end of the previous calendar year to the reference date.
    YearToDate,
    /// One calendar year.
    Year(i32),
    /// A fixed range.
    Between { from: NaiveDate, to: NaiveDate },
    /// From a fixed date to the reference date.
    Since(NaiveDate),
}

/// Half-open date range `(start, end]`.
///
/// The start day is excluded: it is the valuation baseline, transactions
/// booked on it belong to the previous window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateInterval {
    /// Interval `(start, end]`; bounds are swapped if given in reverse.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside `(start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start < date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} .. {}]", self.start, self.end)
    }
}

/// Last day of `year`, clamped to the representable date range.
fn end_of_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

fn end_of_previous_year(year: i32) -> NaiveDate {
    year.checked_sub(1).map_or(NaiveDate::MIN, end_of_year)
}

impl ReportingWindow {
    /// Resolve the window against `reference` (the snapshot date).
    pub fn interval(&self, reference: NaiveDate) -> DateInterval {
        match *self {
            ReportingWindow::LastYears(n) => {
                let start = reference
                    .checked_sub_months(Months::new(n.saturating_mul(12)))
                    .unwrap_or(NaiveDate::MIN);
                DateInterval::new(start, reference)
            }
            ReportingWindow::LastDays(n) => {
                let start = reference
                    .checked_sub_days(Days::new(u64::from(n)))
                    .unwrap_or(NaiveDate::MIN);
                DateInterval::new(start, reference)
            }
            ReportingWindow::YearToDate => DateInterval::new(end_of_previous_year(reference.year()), reference),
            ReportingWindow::Year(year) => DateInterval::new(end_of_previous_year(year), end_of_year(year)),
            ReportingWindow::Between { from, to } => DateInterval::new(from, to),
            ReportingWindow::Since(from) => DateInterval::new(from, reference),
        }
    }
}

impl fmt::Display for ReportingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportingWindow::LastYears(n) => write!(f, "last {n} year(s)"),
            ReportingWindow::LastDays(n) => write!(f, "last {n} day(s)"),
            ReportingWindow::YearToDate => f.write_str("year to date"),
            ReportingWindow::Year(y) => write!(f, "year {y}"),
            ReportingWindow::Between { from, to } => write!(f, "{from} - {to}"),
            ReportingWindow::Since(from) => write!(f, "since {from}"),
        }
    }
}
