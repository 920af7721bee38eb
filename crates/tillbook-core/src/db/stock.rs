//! Stock items, movements and price history

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{get_decimal, get_enum, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{
    NewStockItem, NewStockTransaction, PricePoint, StockItem, StockItemUpdate, StockMovement,
    StockTransaction,
};
use crate::money::{add_exact, sub_exact};

const ITEM_COLUMNS: &str =
    "id, name, unit, unit_price, current_stock, min_stock, is_active, created_at";
const TRANSACTION_COLUMNS: &str = "id, item_id, kind, quantity, price, date, notes, created_at";

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<StockItem> {
    let created_at: String = row.get(7)?;
    Ok(StockItem {
        id: row.get(0)?,
        name: row.get(1)?,
        unit: row.get(2)?,
        unit_price: get_decimal(row, 3)?,
        current_stock: get_decimal(row, 4)?,
        min_stock: get_decimal(row, 5)?,
        is_active: row.get(6)?,
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<StockTransaction> {
    let created_at: String = row.get(7)?;
    Ok(StockTransaction {
        id: row.get(0)?,
        item_id: row.get(1)?,
        kind: get_enum(row, 2)?,
        quantity: get_decimal(row, 3)?,
        price: get_decimal(row, 4)?,
        date: row.get(5)?,
        notes: row.get(6)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    pub fn create_stock_item(&self, item: &NewStockItem) -> Result<StockItem> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO stock_items (name, unit, unit_price, current_stock, min_stock)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                item.name,
                item.unit,
                item.unit_price.to_string(),
                item.current_stock.to_string(),
                item.min_stock.to_string(),
            ],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Stock item '{}'", item.name)))?;
        let id = conn.last_insert_rowid();
        self.get_stock_item(id)?
            .ok_or_else(|| Error::NotFound(format!("Stock item {} not found", id)))
    }

    pub fn get_stock_item(&self, id: i64) -> Result<Option<StockItem>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                &format!("SELECT {} FROM stock_items WHERE id = ?", ITEM_COLUMNS),
                params![id],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    /// List active stock items ordered by name
    pub fn list_stock_items(&self) -> Result<Vec<StockItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM stock_items WHERE is_active = 1 ORDER BY name",
            ITEM_COLUMNS
        ))?;
        let items = stmt
            .query_map([], row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Active items at or below their minimum stock level
    pub fn low_stock_items(&self) -> Result<Vec<StockItem>> {
        Ok(self
            .list_stock_items()?
            .into_iter()
            .filter(StockItem::is_low)
            .collect())
    }

    /// Update item details. `current_stock` only moves through transactions.
    pub fn update_stock_item(&self, id: i64, update: &StockItemUpdate) -> Result<StockItem> {
        let current = self
            .get_stock_item(id)?
            .ok_or_else(|| Error::NotFound(format!("Stock item {} not found", id)))?;

        let name = update.name.clone().unwrap_or(current.name);
        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE stock_items
            SET name = ?, unit = ?, unit_price = ?, min_stock = ?, is_active = ?
            WHERE id = ?
            "#,
            params![
                name,
                update.unit.clone().unwrap_or(current.unit),
                update.unit_price.unwrap_or(current.unit_price).to_string(),
                update.min_stock.unwrap_or(current.min_stock).to_string(),
                update.is_active.unwrap_or(current.is_active),
                id,
            ],
        )
        .map_err(|e| Error::from_constraint(e, &format!("Stock item '{}'", name)))?;

        self.get_stock_item(id)?
            .ok_or_else(|| Error::NotFound(format!("Stock item {} not found", id)))
    }

    /// Deactivate a stock item; its transactions are kept
    pub fn deactivate_stock_item(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE stock_items SET is_active = 0 WHERE id = ?",
            params![id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Stock item {} not found", id)));
        }
        Ok(())
    }

    /// Record a movement and adjust the item's stock level atomically.
    ///
    /// An outgoing movement larger than the current stock is rejected.
    pub fn record_stock_transaction(
        &self,
        item_id: i64,
        movement: &NewStockTransaction,
    ) -> Result<StockTransaction> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let current: Option<String> = tx
            .query_row(
                "SELECT current_stock FROM stock_items WHERE id = ? AND is_active = 1",
                params![item_id],
                |row| row.get(0),
            )
            .optional()?;
        let current = current
            .ok_or_else(|| Error::NotFound(format!("Stock item {} not found", item_id)))?;
        let current: Decimal = current
            .parse()
            .map_err(|e| Error::InvalidData(format!("Corrupt stock level: {}", e)))?;

        let next = match movement.kind {
            StockMovement::In => add_exact(current, movement.quantity)?,
            StockMovement::Out => sub_exact(current, movement.quantity)?,
        };
        if next < Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "Insufficient stock: {} available, {} requested",
                current, movement.quantity
            )));
        }

        tx.execute(
            r#"
            INSERT INTO stock_transactions (item_id, kind, quantity, price, date, notes)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                item_id,
                movement.kind.as_str(),
                movement.quantity.to_string(),
                movement.price.to_string(),
                movement.date,
                movement.notes,
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE stock_items SET current_stock = ? WHERE id = ?",
            params![next.to_string(), item_id],
        )?;

        let created = tx.query_row(
            &format!(
                "SELECT {} FROM stock_transactions WHERE id = ?",
                TRANSACTION_COLUMNS
            ),
            params![id],
            row_to_transaction,
        )?;
        tx.commit()?;
        Ok(created)
    }

    /// Movements for an item, newest first
    pub fn list_stock_transactions(&self, item_id: i64) -> Result<Vec<StockTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM stock_transactions WHERE item_id = ? ORDER BY date DESC, id DESC",
            TRANSACTION_COLUMNS
        ))?;
        let transactions = stmt
            .query_map(params![item_id], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Prices paid and received for an item, oldest first
    pub fn price_history(&self, item_id: i64) -> Result<Vec<PricePoint>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT date, kind, price FROM stock_transactions WHERE item_id = ? ORDER BY date, id",
        )?;
        let points = stmt
            .query_map(params![item_id], |row| {
                Ok(PricePoint {
                    date: row.get(0)?,
                    kind: get_enum(row, 1)?,
                    price: get_decimal(row, 2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(points)
    }
}
