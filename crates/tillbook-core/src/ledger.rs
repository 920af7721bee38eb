//! Reserve expenditure ledger
//!
//! Folds expenditure rows into per-account and per-month totals and derives the
//! remaining balance of each reserve account. Balances are not clamped: an
//! over-spent account reports a negative remainder.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocation::{AccountAllocation, MonthlyNet};
use crate::error::Result;
use crate::models::{ReserveAllocation, ReserveExpenditure};
use crate::money::{add_exact, sub_exact};

fn accumulate(map: &mut BTreeMap<String, Decimal>, key: &str, amount: Decimal) -> Result<()> {
    let slot = map.entry(key.to_string()).or_insert(Decimal::ZERO);
    *slot = add_exact(*slot, amount)?;
    Ok(())
}

/// Expenditure totals for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthExpenditure {
    pub month: u32,
    pub total: Decimal,
    pub by_account: BTreeMap<String, Decimal>,
}

/// Expenditure totals for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureSummary {
    pub year: i32,
    pub total_expended: Decimal,
    pub by_account: BTreeMap<String, Decimal>,
    pub monthly_expenditure: Vec<MonthExpenditure>,
}

/// Allocated vs expended for one reserve account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// `None` when expenditures name an account that is not active
    pub account_id: Option<i64>,
    pub account: String,
    pub percentage: Option<Decimal>,
    pub allocated: Decimal,
    pub expended: Decimal,
    pub remaining: Decimal,
}

/// Reserve position for a year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveSummary {
    pub year: i32,
    pub balances: Vec<AccountBalance>,
    pub total_allocated: Decimal,
    pub total_expended: Decimal,
    pub total_remaining: Decimal,
    pub monthly_net: Vec<MonthlyNet>,
    pub allocations: Vec<AccountAllocation>,
    pub expenditures: ExpenditureSummary,
    /// Manually recorded allocation entries for the year, listed for reference.
    /// They do not feed into the balances.
    pub recorded_allocations: Vec<ReserveAllocation>,
}

/// Sum a year's expenditures by account and by month. Rows dated outside
/// `year` are skipped.
pub fn summarize_expenditures(
    year: i32,
    rows: &[ReserveExpenditure],
) -> Result<ExpenditureSummary> {
    let mut total_expended = Decimal::ZERO;
    let mut by_account: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut monthly: Vec<MonthExpenditure> = (1..=12)
        .map(|month| MonthExpenditure {
            month,
            total: Decimal::ZERO,
            by_account: BTreeMap::new(),
        })
        .collect();

    for row in rows.iter().filter(|r| r.expenditure_date.year() == year) {
        total_expended = add_exact(total_expended, row.amount)?;
        accumulate(&mut by_account, &row.source_type, row.amount)?;

        let bucket = &mut monthly[row.expenditure_date.month0() as usize];
        bucket.total = add_exact(bucket.total, row.amount)?;
        accumulate(&mut bucket.by_account, &row.source_type, row.amount)?;
    }

    Ok(ExpenditureSummary {
        year,
        total_expended,
        by_account,
        monthly_expenditure: monthly,
    })
}

/// Remaining balance per account = allocated - expended.
///
/// Accounts come first in allocation order; expenditure sources that match no
/// allocated account follow with `allocated = 0`.
pub fn remaining_balances(
    allocations: &[AccountAllocation],
    expenditures: &ExpenditureSummary,
) -> Result<Vec<AccountBalance>> {
    let mut balances = allocations
        .iter()
        .map(|a| -> Result<AccountBalance> {
            let expended = expenditures
                .by_account
                .get(&a.name)
                .copied()
                .unwrap_or(Decimal::ZERO);
            Ok(AccountBalance {
                account_id: Some(a.account_id),
                account: a.name.clone(),
                percentage: Some(a.percentage),
                allocated: a.allocated,
                expended,
                remaining: sub_exact(a.allocated, expended)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for (name, expended) in &expenditures.by_account {
        if allocations.iter().any(|a| &a.name == name) {
            continue;
        }
        balances.push(AccountBalance {
            account_id: None,
            account: name.clone(),
            percentage: None,
            allocated: Decimal::ZERO,
            expended: *expended,
            remaining: -*expended,
        });
    }

    Ok(balances)
}
