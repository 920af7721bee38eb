//! Reference data: categories, branches and shareholders
//!
//! All three share the same lifecycle: unique name, partial update, and
//! deletion by clearing `is_active`.

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{get_decimal, merge_text, Database};
use crate::error::{Error, Result};
use crate::models::{Branch, Category, ReferenceFields, Shareholder};

fn required_name(fields: &ReferenceFields) -> Result<&str> {
    match fields.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(Error::field("name", "is required")),
    }
}

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        is_active: row.get(3)?,
    })
}

fn row_to_branch(row: &rusqlite::Row<'_>) -> rusqlite::Result<Branch> {
    Ok(Branch {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        is_active: row.get(4)?,
    })
}

fn row_to_shareholder(row: &rusqlite::Row<'_>) -> rusqlite::Result<Shareholder> {
    Ok(Shareholder {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        share_percentage: get_decimal(row, 3)?,
        is_active: row.get(4)?,
    })
}

impl Database {
    /// Clear `is_active` on a reference-data row
    fn deactivate(&self, table: &str, label: &str, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            &format!("UPDATE {} SET is_active = 0 WHERE id = ?", table),
            params![id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("{} {} not found", label, id)));
        }
        Ok(())
    }

    // ========== Categories ==========

    pub fn create_category(&self, fields: &ReferenceFields) -> Result<Category> {
        let name = required_name(fields)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO categories (name, description) VALUES (?, ?)",
            params![name, fields.description],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Category '{}'", name)))?;
        let id = conn.last_insert_rowid();
        self.get_category(id)?
            .ok_or_else(|| Error::NotFound(format!("Category {} not found", id)))
    }

    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, description, is_active FROM categories WHERE id = ?",
                params![id],
                row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, is_active FROM categories WHERE is_active = 1 ORDER BY name",
        )?;
        let categories = stmt
            .query_map([], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    pub fn update_category(&self, id: i64, fields: &ReferenceFields) -> Result<Category> {
        let current = self
            .get_category(id)?
            .ok_or_else(|| Error::NotFound(format!("Category {} not found", id)))?;
        let name = fields.name.clone().unwrap_or(current.name);

        let conn = self.conn()?;
        conn.execute(
            "UPDATE categories SET name = ?, description = ?, is_active = ? WHERE id = ?",
            params![
                name,
                merge_text(&fields.description, current.description),
                fields.is_active.unwrap_or(current.is_active),
                id,
            ],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Category '{}'", name)))?;

        self.get_category(id)?
            .ok_or_else(|| Error::NotFound(format!("Category {} not found", id)))
    }

    pub fn deactivate_category(&self, id: i64) -> Result<()> {
        self.deactivate("categories", "Category", id)
    }

    // ========== Branches ==========

    pub fn create_branch(&self, fields: &ReferenceFields) -> Result<Branch> {
        let name = required_name(fields)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO branches (name, address, phone) VALUES (?, ?, ?)",
            params![name, fields.address, fields.phone],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Branch '{}'", name)))?;
        let id = conn.last_insert_rowid();
        self.get_branch(id)?
            .ok_or_else(|| Error::NotFound(format!("Branch {} not found", id)))
    }

    pub fn get_branch(&self, id: i64) -> Result<Option<Branch>> {
        let conn = self.conn()?;
        let branch = conn
            .query_row(
                "SELECT id, name, address, phone, is_active FROM branches WHERE id = ?",
                params![id],
                row_to_branch,
            )
            .optional()?;
        Ok(branch)
    }

    pub fn list_branches(&self) -> Result<Vec<Branch>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, address, phone, is_active FROM branches WHERE is_active = 1 ORDER BY name",
        )?;
        let branches = stmt
            .query_map([], row_to_branch)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(branches)
    }

    pub fn update_branch(&self, id: i64, fields: &ReferenceFields) -> Result<Branch> {
        let current = self
            .get_branch(id)?
            .ok_or_else(|| Error::NotFound(format!("Branch {} not found", id)))?;
        let name = fields.name.clone().unwrap_or(current.name);

        let conn = self.conn()?;
        conn.execute(
            "UPDATE branches SET name = ?, address = ?, phone = ?, is_active = ? WHERE id = ?",
            params![
                name,
                merge_text(&fields.address, current.address),
                merge_text(&fields.phone, current.phone),
                fields.is_active.unwrap_or(current.is_active),
                id,
            ],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Branch '{}'", name)))?;

        self.get_branch(id)?
            .ok_or_else(|| Error::NotFound(format!("Branch {} not found", id)))
    }

    pub fn deactivate_branch(&self, id: i64) -> Result<()> {
        self.deactivate("branches", "Branch", id)
    }

    // ========== Shareholders ==========

    pub fn create_shareholder(&self, fields: &ReferenceFields) -> Result<Shareholder> {
        let name = required_name(fields)?;
        let share = fields.share_percentage.unwrap_or(Decimal::ZERO);
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO shareholders (name, phone, share_percentage) VALUES (?, ?, ?)",
            params![name, fields.phone, share.to_string()],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Shareholder '{}'", name)))?;
        let id = conn.last_insert_rowid();
        self.get_shareholder(id)?
            .ok_or_else(|| Error::NotFound(format!("Shareholder {} not found", id)))
    }

    pub fn get_shareholder(&self, id: i64) -> Result<Option<Shareholder>> {
        let conn = self.conn()?;
        let shareholder = conn
            .query_row(
                "SELECT id, name, phone, share_percentage, is_active FROM shareholders WHERE id = ?",
                params![id],
                row_to_shareholder,
            )
            .optional()?;
        Ok(shareholder)
    }

    pub fn list_shareholders(&self) -> Result<Vec<Shareholder>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, phone, share_percentage, is_active FROM shareholders WHERE is_active = 1 ORDER BY name",
        )?;
        let shareholders = stmt
            .query_map([], row_to_shareholder)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(shareholders)
    }

    pub fn update_shareholder(&self, id: i64, fields: &ReferenceFields) -> Result<Shareholder> {
        let current = self
            .get_shareholder(id)?
            .ok_or_else(|| Error::NotFound(format!("Shareholder {} not found", id)))?;
        let name = fields.name.clone().unwrap_or(current.name);

        let conn = self.conn()?;
        conn.execute(
            "UPDATE shareholders SET name = ?, phone = ?, share_percentage = ?, is_active = ? WHERE id = ?",
            params![
                name,
                merge_text(&fields.phone, current.phone),
                fields
                    .share_percentage
                    .unwrap_or(current.share_percentage)
                    .to_string(),
                fields.is_active.unwrap_or(current.is_active),
                id,
            ],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Shareholder '{}'", name)))?;

        self.get_shareholder(id)?
            .ok_or_else(|| Error::NotFound(format!("Shareholder {} not found", id)))
    }

    pub fn deactivate_shareholder(&self, id: i64) -> Result<()> {
        self.deactivate("shareholders", "Shareholder", id)
    }
}
