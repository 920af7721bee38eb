//! Reserve allocation engine
//!
//! Each month's net profit (revenue minus spent expenses) is split across the
//! active allocation accounts by percentage. A loss month contributes nothing:
//! its negative share is clamped to zero and never reduces what earlier months
//! already allocated. Percentages are used as configured, without being
//! normalized to 100.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::AllocationAccount;
use crate::money::{add_exact, div_exact, mul_exact, sub_exact};

/// Revenue, expenses and net profit for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyNet {
    pub month: u32,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub net_profit: Decimal,
}

/// One account's allocation for a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountAllocation {
    pub account_id: i64,
    pub name: String,
    pub percentage: Decimal,
    /// Clamped contribution per month, index = month - 1
    pub monthly: Vec<Decimal>,
    pub allocated: Decimal,
}

/// Net profit for months 1..=12 from per-month revenue and expense totals.
/// A missing month counts as zero.
pub fn monthly_net_profit(
    revenues: &[Decimal; 12],
    expenses: &[Decimal; 12],
) -> Result<Vec<MonthlyNet>> {
    (0..12)
        .map(|i| -> Result<MonthlyNet> {
            Ok(MonthlyNet {
                month: i as u32 + 1,
                revenue: revenues[i],
                expenses: expenses[i],
                net_profit: sub_exact(revenues[i], expenses[i])?,
            })
        })
        .collect()
}

/// One month's share for an account, clamped at zero
pub fn monthly_share(net_profit: Decimal, percentage: Decimal) -> Result<Decimal> {
    if net_profit.is_sign_negative() {
        return Ok(Decimal::ZERO);
    }
    let share = div_exact(mul_exact(net_profit, percentage)?, Decimal::ONE_HUNDRED)?;
    Ok(share.max(Decimal::ZERO))
}

/// Accumulate each active account's allocation over the given months
pub fn allocate(
    accounts: &[AllocationAccount],
    months: &[MonthlyNet],
) -> Result<Vec<AccountAllocation>> {
    accounts
        .iter()
        .filter(|a| a.is_active)
        .map(|account| -> Result<AccountAllocation> {
            let mut monthly = vec![Decimal::ZERO; 12];
            let mut allocated = Decimal::ZERO;
            for m in months {
                let share = monthly_share(m.net_profit, account.percentage)?;
                if (1..=12).contains(&m.month) {
                    let slot = &mut monthly[(m.month - 1) as usize];
                    *slot = add_exact(*slot, share)?;
                }
                allocated = add_exact(allocated, share)?;
            }
            Ok(AccountAllocation {
                account_id: account.id,
                name: account.name.clone(),
                percentage: account.percentage,
                monthly,
                allocated,
            })
        })
        .collect()
}
