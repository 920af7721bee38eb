//! Revenue operations

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{get_decimal, parse_datetime, Database};
use crate::aggregation::{monthly_totals, summarize, PeriodSummary};
use crate::error::{Error, Result};
use crate::models::Revenue;
use crate::period::Period;

const REVENUE_COLUMNS: &str = "id, year, month, amount, created_at, updated_at";

fn row_to_revenue(row: &rusqlite::Row<'_>) -> rusqlite::Result<Revenue> {
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;
    Ok(Revenue {
        id: row.get(0)?,
        year: row.get(1)?,
        month: row.get(2)?,
        amount: get_decimal(row, 3)?,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

impl Database {
    /// Record the revenue for a month, replacing any existing value
    pub fn upsert_revenue(&self, year: i32, month: u32, amount: Decimal) -> Result<Revenue> {
        if !(1..=12).contains(&month) {
            return Err(Error::field("month", "must be between 1 and 12"));
        }
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO revenues (year, month, amount) VALUES (?, ?, ?)
            ON CONFLICT (year, month)
            DO UPDATE SET amount = excluded.amount, updated_at = CURRENT_TIMESTAMP
            "#,
            params![year, month, amount.to_string()],
        )?;

        let revenue = conn.query_row(
            &format!(
                "SELECT {} FROM revenues WHERE year = ? AND month = ?",
                REVENUE_COLUMNS
            ),
            params![year, month],
            row_to_revenue,
        )?;
        Ok(revenue)
    }

    /// Get a revenue row by ID
    pub fn get_revenue(&self, id: i64) -> Result<Option<Revenue>> {
        let conn = self.conn()?;
        let revenue = conn
            .query_row(
                &format!("SELECT {} FROM revenues WHERE id = ?", REVENUE_COLUMNS),
                params![id],
                row_to_revenue,
            )
            .optional()?;
        Ok(revenue)
    }

    /// Update the amount of an existing revenue row
    pub fn update_revenue(&self, id: i64, amount: Decimal) -> Result<Revenue> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE revenues SET amount = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![amount.to_string(), id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Revenue {} not found", id)));
        }
        self.get_revenue(id)?
            .ok_or_else(|| Error::NotFound(format!("Revenue {} not found", id)))
    }

    /// List revenues for a year, ordered by month
    pub fn list_revenues(&self, year: i32) -> Result<Vec<Revenue>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM revenues WHERE year = ? ORDER BY month",
            REVENUE_COLUMNS
        ))?;
        let revenues = stmt
            .query_map(params![year], row_to_revenue)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(revenues)
    }

    /// Revenue per month for a year, index = month - 1
    pub fn revenue_by_month(&self, year: i32) -> Result<[Decimal; 12]> {
        let revenues = self.list_revenues(year)?;
        monthly_totals(revenues.into_iter().map(|r| (r.month, r.amount)))
    }

    /// Revenue total for a period compared with the prior period
    pub fn revenue_summary(&self, period: Period) -> Result<PeriodSummary> {
        let previous = period.previous();
        let mut rows = self.list_revenues(period.year())?;
        if previous.year() != period.year() {
            rows.extend(self.list_revenues(previous.year())?);
        }
        summarize(
            period,
            rows.into_iter().map(|r| (r.year, r.month, r.amount)),
        )
    }
}
