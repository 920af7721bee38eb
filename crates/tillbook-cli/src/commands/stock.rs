//! Stock listing command

use anyhow::Result;

use tillbook_core::Database;

use super::{truncate, Money};

pub fn cmd_stock_list(db: &Database, low_only: bool) -> Result<()> {
    let items = if low_only {
        db.low_stock_items()?
    } else {
        db.list_stock_items()?
    };
    let money = Money::load(db)?;

    println!();
    println!("📦 {}", if low_only { "Low stock" } else { "Stock" });
    println!("   ─────────────────────────────────────────────────────────────");
    if items.is_empty() {
        println!("   (no items)");
    }
    for item in &items {
        let flag = if item.is_low() { " ⚠️" } else { "" };
        println!(
            "   #{:<4} {:<24} {:>8} {:<6} min {:>6}  {:>18}{}",
            item.id,
            truncate(&item.name, 24),
            item.current_stock,
            item.unit,
            item.min_stock,
            money.show(item.unit_price),
            flag
        );
    }
    println!();
    Ok(())
}
