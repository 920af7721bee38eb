//! Fiscal periods and date derivation

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Derive the (year, month) pair stored alongside a dated record.
///
/// Every write path that persists a date with denormalized year/month columns
/// goes through this function.
pub fn derive_period(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidData(format!("Invalid date '{}' (use YYYY-MM-DD)", s)))
}

/// Earliest year accepted for a reporting period
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted for a reporting period
pub const MAX_YEAR: i32 = 9999;

/// A reporting period: a single month or a whole year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Period {
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl Period {
    /// Build a period from a year in 1900..=9999 and optional month
    pub fn new(year: i32, month: Option<u32>) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::field(
                "year",
                format!("must be between {} and {}, got {}", MIN_YEAR, MAX_YEAR, year),
            ));
        }
        match month {
            Some(m) if !(1..=12).contains(&m) => Err(Error::field(
                "month",
                format!("must be between 1 and 12, got {}", m),
            )),
            Some(m) => Ok(Self::Month { year, month: m }),
            None => Ok(Self::Year { year }),
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Self::Month { year, .. } | Self::Year { year } => *year,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            Self::Month { month, .. } => Some(*month),
            Self::Year { .. } => None,
        }
    }

    /// The prior comparable period: previous month for monthly periods
    /// (January rolls back to December), previous year for annual ones.
    pub fn previous(&self) -> Self {
        match *self {
            Self::Month { year, month: 1 } => Self::Month {
                year: year.saturating_sub(1),
                month: 12,
            },
            Self::Month { year, month } => Self::Month {
                year,
                month: month - 1,
            },
            Self::Year { year } => Self::Year {
                year: year.saturating_sub(1),
            },
        }
    }

    /// Whether a (year, month) pair falls inside this period
    pub fn contains(&self, year: i32, month: u32) -> bool {
        match *self {
            Self::Month { year: y, month: m } => y == year && m == month,
            Self::Year { year: y } => y == year,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{}-{:02}", year, month),
            Self::Year { year } => write!(f, "{}", year),
        }
    }
}
