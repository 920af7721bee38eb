//! Reserve fund operations: allocation accounts, recorded allocations,
//! expenditures and the yearly reserve summary

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{get_decimal, merge_text, parse_datetime, Database};
use crate::aggregation::sum_amounts;
use crate::allocation::{allocate, monthly_net_profit};
use crate::error::{Error, Result};
use crate::ledger::{remaining_balances, summarize_expenditures, ExpenditureSummary, ReserveSummary};
use crate::models::{
    AllocationAccount, AllocationAccountUpdate, NewAllocationAccount, NewReserveAllocation,
    NewReserveExpenditure, ReserveAllocation, ReserveExpenditure, ReserveExpenditureUpdate,
};
use crate::money::sub_exact;

const ACCOUNT_COLUMNS: &str = "id, name, description, percentage, is_active, created_at";
const ALLOCATION_COLUMNS: &str = "id, year, month, account_type, amount, notes, created_at";
const EXPENDITURE_COLUMNS: &str =
    "id, name, source_type, amount, expenditure_date, notes, created_at";

fn row_to_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<AllocationAccount> {
    let created_at: String = row.get(5)?;
    Ok(AllocationAccount {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        percentage: get_decimal(row, 3)?,
        is_active: row.get(4)?,
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_allocation(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReserveAllocation> {
    let created_at: String = row.get(6)?;
    Ok(ReserveAllocation {
        id: row.get(0)?,
        year: row.get(1)?,
        month: row.get(2)?,
        account_type: row.get(3)?,
        amount: get_decimal(row, 4)?,
        notes: row.get(5)?,
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_expenditure(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReserveExpenditure> {
    let created_at: String = row.get(6)?;
    Ok(ReserveExpenditure {
        id: row.get(0)?,
        name: row.get(1)?,
        source_type: row.get(2)?,
        amount: get_decimal(row, 3)?,
        expenditure_date: row.get(4)?,
        notes: row.get(5)?,
        created_at: parse_datetime(&created_at),
    })
}

/// First and last day of a year, for date-range filters
fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| Error::InvalidData(format!("Invalid year {}", year)))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| Error::InvalidData(format!("Invalid year {}", year)))?;
    Ok((start, end))
}

impl Database {
    // ========== Allocation accounts ==========

    /// Create an allocation account. Percentages are not checked against
    /// other accounts.
    pub fn create_allocation_account(&self, account: &NewAllocationAccount) -> Result<AllocationAccount> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO allocation_accounts (name, description, percentage) VALUES (?, ?, ?)",
            params![
                account.name,
                account.description,
                account.percentage.to_string()
            ],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Allocation account '{}'", account.name)))?;
        let id = conn.last_insert_rowid();
        self.get_allocation_account(id)?
            .ok_or_else(|| Error::NotFound(format!("Allocation account {} not found", id)))
    }

    pub fn get_allocation_account(&self, id: i64) -> Result<Option<AllocationAccount>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                &format!(
                    "SELECT {} FROM allocation_accounts WHERE id = ?",
                    ACCOUNT_COLUMNS
                ),
                params![id],
                row_to_account,
            )
            .optional()?;
        Ok(account)
    }

    /// List allocation accounts, optionally including deactivated ones
    pub fn list_allocation_accounts(&self, include_inactive: bool) -> Result<Vec<AllocationAccount>> {
        let conn = self.conn()?;
        let sql = if include_inactive {
            format!("SELECT {} FROM allocation_accounts ORDER BY name", ACCOUNT_COLUMNS)
        } else {
            format!(
                "SELECT {} FROM allocation_accounts WHERE is_active = 1 ORDER BY name",
                ACCOUNT_COLUMNS
            )
        };
        let mut stmt = conn.prepare(&sql)?;
        let accounts = stmt
            .query_map([], row_to_account)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    pub fn update_allocation_account(
        &self,
        id: i64,
        update: &AllocationAccountUpdate,
    ) -> Result<AllocationAccount> {
        let current = self
            .get_allocation_account(id)?
            .ok_or_else(|| Error::NotFound(format!("Allocation account {} not found", id)))?;

        let name = update.name.clone().unwrap_or(current.name);
        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE allocation_accounts
            SET name = ?, description = ?, percentage = ?, is_active = ?
            WHERE id = ?
            "#,
            params![
                name,
                merge_text(&update.description, current.description),
                update.percentage.unwrap_or(current.percentage).to_string(),
                update.is_active.unwrap_or(current.is_active),
                id,
            ],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Allocation account '{}'", name)))?;

        self.get_allocation_account(id)?
            .ok_or_else(|| Error::NotFound(format!("Allocation account {} not found", id)))
    }

    /// Deactivate an allocation account (soft delete)
    pub fn deactivate_allocation_account(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE allocation_accounts SET is_active = 0 WHERE id = ?",
            params![id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Allocation account {} not found", id)));
        }
        Ok(())
    }

    // ========== Recorded allocations ==========

    pub fn create_reserve_allocation(&self, allocation: &NewReserveAllocation) -> Result<ReserveAllocation> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO reserve_allocations (year, month, account_type, amount, notes)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                allocation.year,
                allocation.month,
                allocation.account_type,
                allocation.amount.to_string(),
                allocation.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();
        let created = conn.query_row(
            &format!(
                "SELECT {} FROM reserve_allocations WHERE id = ?",
                ALLOCATION_COLUMNS
            ),
            params![id],
            row_to_allocation,
        )?;
        Ok(created)
    }

    pub fn list_reserve_allocations(&self, year: i32) -> Result<Vec<ReserveAllocation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reserve_allocations WHERE year = ? ORDER BY month, id",
            ALLOCATION_COLUMNS
        ))?;
        let allocations = stmt
            .query_map(params![year], row_to_allocation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(allocations)
    }

    pub fn delete_reserve_allocation(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM reserve_allocations WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Reserve allocation {} not found", id)));
        }
        Ok(())
    }

    // ========== Expenditures ==========

    pub fn create_reserve_expenditure(
        &self,
        expenditure: &NewReserveExpenditure,
    ) -> Result<ReserveExpenditure> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO reserve_expenditures (name, source_type, amount, expenditure_date, notes)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                expenditure.name,
                expenditure.source_type,
                expenditure.amount.to_string(),
                expenditure.expenditure_date,
                expenditure.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();
        self.get_reserve_expenditure(id)?
            .ok_or_else(|| Error::NotFound(format!("Reserve expenditure {} not found", id)))
    }

    pub fn get_reserve_expenditure(&self, id: i64) -> Result<Option<ReserveExpenditure>> {
        let conn = self.conn()?;
        let expenditure = conn
            .query_row(
                &format!(
                    "SELECT {} FROM reserve_expenditures WHERE id = ?",
                    EXPENDITURE_COLUMNS
                ),
                params![id],
                row_to_expenditure,
            )
            .optional()?;
        Ok(expenditure)
    }

    /// List expenditures dated within a year
    pub fn list_reserve_expenditures(&self, year: i32) -> Result<Vec<ReserveExpenditure>> {
        let (start, end) = year_bounds(year)?;
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reserve_expenditures WHERE expenditure_date BETWEEN ? AND ? ORDER BY expenditure_date, id",
            EXPENDITURE_COLUMNS
        ))?;
        let expenditures = stmt
            .query_map(params![start, end], row_to_expenditure)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenditures)
    }

    pub fn update_reserve_expenditure(
        &self,
        id: i64,
        update: &ReserveExpenditureUpdate,
    ) -> Result<ReserveExpenditure> {
        let current = self
            .get_reserve_expenditure(id)?
            .ok_or_else(|| Error::NotFound(format!("Reserve expenditure {} not found", id)))?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE reserve_expenditures
            SET name = ?, source_type = ?, amount = ?, expenditure_date = ?, notes = ?
            WHERE id = ?
            "#,
            params![
                update.name.clone().unwrap_or(current.name),
                update.source_type.clone().unwrap_or(current.source_type),
                update.amount.unwrap_or(current.amount).to_string(),
                update.expenditure_date.unwrap_or(current.expenditure_date),
                merge_text(&update.notes, current.notes),
                id,
            ],
        )?;

        self.get_reserve_expenditure(id)?
            .ok_or_else(|| Error::NotFound(format!("Reserve expenditure {} not found", id)))
    }

    pub fn delete_reserve_expenditure(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM reserve_expenditures WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Reserve expenditure {} not found", id)));
        }
        Ok(())
    }

    // ========== Summaries ==========

    /// Expenditure totals by account and month for a year
    pub fn expenditure_summary(&self, year: i32) -> Result<ExpenditureSummary> {
        let rows = self.list_reserve_expenditures(year)?;
        summarize_expenditures(year, &rows)
    }

    /// Allocated, expended and remaining per reserve account for a year
    pub fn reserve_summary(&self, year: i32) -> Result<ReserveSummary> {
        let revenues = self.revenue_by_month(year)?;
        let expenses = self.expenses_by_month(year)?;
        let monthly_net = monthly_net_profit(&revenues, &expenses)?;

        let accounts = self.list_allocation_accounts(false)?;
        let allocations = allocate(&accounts, &monthly_net)?;
        let expenditures = self.expenditure_summary(year)?;
        let balances = remaining_balances(&allocations, &expenditures)?;

        let total_allocated = sum_amounts(allocations.iter().map(|a| a.allocated))?;
        let total_expended = expenditures.total_expended;

        Ok(ReserveSummary {
            year,
            total_remaining: sub_exact(total_allocated, total_expended)?,
            total_allocated,
            total_expended,
            balances,
            monthly_net,
            allocations,
            expenditures,
            recorded_allocations: self.list_reserve_allocations(year)?,
        })
    }
}
