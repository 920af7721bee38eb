//! Revenue and expense aggregation
//!
//! Sums are folded in Rust over `Decimal` values read from the record store,
//! never with SQL `SUM` over the TEXT amount columns, so totals stay exact.
//! Overflow surfaces as `Error::InvalidData` rather than a panic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::money::{add_exact, div_exact, mul_exact, sub_exact};
use crate::period::Period;

/// Total for one period compared with the prior comparable period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub total: Decimal,
    pub previous_total: Decimal,
    /// Percentage change vs the previous period, rounded to 2 places
    pub change_percent: Decimal,
    /// Number of rows in the current period
    pub count: usize,
}

/// Decimal-exact sum
pub fn sum_amounts<I>(amounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, add_exact)
}

/// Percentage change from `previous` to `current`.
///
/// A zero previous value yields 0 rather than a division error.
pub fn percent_change(current: Decimal, previous: Decimal) -> Result<Decimal> {
    if previous.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = div_exact(sub_exact(current, previous)?, previous)?;
    Ok(mul_exact(ratio, Decimal::ONE_HUNDRED)?.round_dp(2))
}

/// Bucket (month, amount) rows into a 12-slot array indexed by month - 1.
/// Rows with a month outside 1..=12 are ignored.
pub fn monthly_totals<I>(rows: I) -> Result<[Decimal; 12]>
where
    I: IntoIterator<Item = (u32, Decimal)>,
{
    let mut totals = [Decimal::ZERO; 12];
    for (month, amount) in rows {
        if (1..=12).contains(&month) {
            let slot = &mut totals[(month - 1) as usize];
            *slot = add_exact(*slot, amount)?;
        }
    }
    Ok(totals)
}

/// Summarize `(year, month, amount)` rows for a period against its predecessor.
///
/// Rows outside both periods are ignored, so callers may pass a superset.
pub fn summarize<I>(period: Period, rows: I) -> Result<PeriodSummary>
where
    I: IntoIterator<Item = (i32, u32, Decimal)>,
{
    let previous = period.previous();
    let mut total = Decimal::ZERO;
    let mut previous_total = Decimal::ZERO;
    let mut count = 0;

    for (year, month, amount) in rows {
        if period.contains(year, month) {
            total = add_exact(total, amount)?;
            count += 1;
        } else if previous.contains(year, month) {
            previous_total = add_exact(previous_total, amount)?;
        }
    }

    Ok(PeriodSummary {
        period,
        total,
        previous_total,
        change_percent: percent_change(total, previous_total)?,
        count,
    })
}
