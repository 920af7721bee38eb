//! Dashboard assembly

use super::Database;
use crate::error::Result;
use crate::models::Dashboard;
use crate::money::sub_exact;
use crate::period::Period;

impl Database {
    /// Bundle the focus month, the full year and the reserve position
    pub fn dashboard(&self, year: i32, month: u32) -> Result<Dashboard> {
        let focus = Period::new(year, Some(month))?;
        let annual = Period::new(year, None)?;

        let revenue = self.revenue_summary(focus)?;
        let expenses = self.expense_summary(focus)?;
        let annual_revenue = self.revenue_summary(annual)?;
        let annual_expenses = self.expense_summary(annual)?;
        let reserves = self.reserve_summary(year)?;

        Ok(Dashboard {
            year,
            month,
            currency: self.system_settings()?.currency,
            net_profit: sub_exact(revenue.total, expenses.total)?,
            annual_net_profit: sub_exact(annual_revenue.total, annual_expenses.total)?,
            revenue,
            expenses,
            annual_revenue,
            annual_expenses,
            monthly: reserves.monthly_net,
            reserve_balances: reserves.balances,
            low_stock_items: self.low_stock_items()?.len(),
        })
    }
}
