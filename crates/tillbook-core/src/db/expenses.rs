//! Expense operations
//!
//! `year` and `month` are always recomputed from `expense_date` with
//! [`derive_period`] on insert and update.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{get_decimal, get_enum, merge_text, parse_datetime, Database};
use crate::aggregation::{monthly_totals, summarize, PeriodSummary};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseStatus, ExpenseUpdate, NewExpense};
use crate::period::{derive_period, Period};

const EXPENSE_COLUMNS: &str =
    "id, name, category, amount, expense_date, year, month, status, notes, created_at";

fn row_to_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
    let created_at: String = row.get(9)?;
    Ok(Expense {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        amount: get_decimal(row, 3)?,
        expense_date: row.get(4)?,
        year: row.get(5)?,
        month: row.get(6)?,
        status: get_enum(row, 7)?,
        notes: row.get(8)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Create an expense
    pub fn create_expense(&self, expense: &NewExpense) -> Result<Expense> {
        let (year, month) = derive_period(expense.expense_date);
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (name, category, amount, expense_date, year, month, status, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                expense.name,
                expense.category,
                expense.amount.to_string(),
                expense.expense_date,
                year,
                month,
                expense.status.as_str(),
                expense.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();
        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {} not found", id)))
    }

    /// Get an expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// Merge a partial update into an expense
    pub fn update_expense(&self, id: i64, update: &ExpenseUpdate) -> Result<Expense> {
        let current = self
            .get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {} not found", id)))?;

        let expense_date = update.expense_date.unwrap_or(current.expense_date);
        let (year, month) = derive_period(expense_date);

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE expenses
            SET name = ?, category = ?, amount = ?, expense_date = ?, year = ?, month = ?,
                status = ?, notes = ?
            WHERE id = ?
            "#,
            params![
                update.name.as_deref().unwrap_or(&current.name),
                merge_text(&update.category, current.category),
                update.amount.unwrap_or(current.amount).to_string(),
                expense_date,
                year,
                month,
                update.status.unwrap_or(current.status).as_str(),
                merge_text(&update.notes, current.notes),
                id,
            ],
        )?;

        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {} not found", id)))
    }

    /// Delete an expense
    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        Ok(())
    }

    /// List expenses for a year, optionally narrowed to a month and status
    pub fn list_expenses(
        &self,
        year: i32,
        month: Option<u32>,
        status: Option<ExpenseStatus>,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut sql = format!("SELECT {} FROM expenses WHERE year = ?", EXPENSE_COLUMNS);
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(year)];
        if let Some(m) = month {
            sql.push_str(" AND month = ?");
            values.push(Box::new(m));
        }
        if let Some(s) = status {
            sql.push_str(" AND status = ?");
            values.push(Box::new(s.as_str()));
        }
        sql.push_str(" ORDER BY expense_date, id");

        let refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(refs.as_slice(), row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Spent expenses per month for a year, index = month - 1
    pub fn expenses_by_month(&self, year: i32) -> Result<[Decimal; 12]> {
        let expenses = self.list_expenses(year, None, Some(ExpenseStatus::Spent))?;
        monthly_totals(expenses.into_iter().map(|e| (e.month, e.amount)))
    }

    /// Spent expense total for a period compared with the prior period
    pub fn expense_summary(&self, period: Period) -> Result<PeriodSummary> {
        let previous = period.previous();
        let mut rows = self.list_expenses(period.year(), None, Some(ExpenseStatus::Spent))?;
        if previous.year() != period.year() {
            rows.extend(self.list_expenses(previous.year(), None, Some(ExpenseStatus::Spent))?);
        }
        summarize(
            period,
            rows.into_iter().map(|e| (e.year, e.month, e.amount)),
        )
    }

    /// Expense dates are the source of truth; repair rows whose year/month drifted
    pub fn resync_expense_periods(&self) -> Result<usize> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, expense_date, year, month FROM expenses")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, NaiveDate>(1)?,
                    row.get::<_, i32>(2)?,
                    row.get::<_, u32>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut fixed = 0;
        for (id, date, year, month) in rows {
            let derived = derive_period(date);
            if derived != (year, month) {
                conn.execute(
                    "UPDATE expenses SET year = ?, month = ? WHERE id = ?",
                    params![derived.0, derived.1, id],
                )?;
                fixed += 1;
            }
        }
        Ok(fixed)
    }
}
