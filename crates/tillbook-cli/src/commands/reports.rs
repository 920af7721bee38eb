//! Report commands (dashboard, reserve summary)

use anyhow::Result;

use tillbook_core::models::Dashboard;
use tillbook_core::{Database, ReserveSummary};

use super::{current_period, Money};

pub fn cmd_dashboard(db: &Database, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let (this_year, this_month) = current_period();
    let dashboard = db.dashboard(year.unwrap_or(this_year), month.unwrap_or(this_month))?;
    let money = Money::load(db)?;
    print_dashboard(&dashboard, &money);
    Ok(())
}

/// Print a dashboard bundle, local or fetched from a server
pub fn print_dashboard(d: &Dashboard, money: &Money) {
    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         🏪 Tillbook Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}-{:02}", d.year, d.month);
    println!(
        "  Revenue:         {}  ({}% vs last month)",
        money.show(d.revenue.total),
        d.revenue.change_percent
    );
    println!(
        "  Expenses:        {}  ({}% vs last month)",
        money.show(d.expenses.total),
        d.expenses.change_percent
    );
    println!("  Net profit:      {}", money.show(d.net_profit));
    println!();
    println!("  Year {}", d.year);
    println!("  Revenue:         {}", money.show(d.annual_revenue.total));
    println!("  Expenses:        {}", money.show(d.annual_expenses.total));
    println!("  Net profit:      {}", money.show(d.annual_net_profit));

    if !d.reserve_balances.is_empty() {
        println!();
        println!("  🏦 Reserves");
        for b in &d.reserve_balances {
            println!("     {:<20} {}", b.account, money.show(b.remaining));
        }
    }

    if d.low_stock_items > 0 {
        println!();
        println!(
            "  ⚠️  {} stock item(s) at or below minimum. Run 'tillbook stock --low'.",
            d.low_stock_items
        );
    }
    println!();
}

pub fn cmd_reserve_summary(db: &Database, year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or(current_period().0);
    let summary = db.reserve_summary(year)?;
    let money = Money::load(db)?;
    print_reserve_summary(&summary, &money);
    Ok(())
}

fn print_reserve_summary(s: &ReserveSummary, money: &Money) {
    println!();
    println!("🏦 Reserves {}", s.year);
    println!("   ─────────────────────────────────────────────────────────────────────");
    println!(
        "   {:<18} {:>6} {:>18} {:>18} {:>18}",
        "Account", "%", "Allocated", "Spent", "Remaining"
    );
    for b in &s.balances {
        let pct = b
            .percentage
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let flag = if b.remaining.is_sign_negative() && !b.remaining.is_zero() {
            " ⚠️"
        } else {
            ""
        };
        println!(
            "   {:<18} {:>6} {:>18} {:>18} {:>18}{}",
            b.account,
            pct,
            money.show(b.allocated),
            money.show(b.expended),
            money.show(b.remaining),
            flag
        );
    }
    println!("   ─────────────────────────────────────────────────────────────────────");
    println!(
        "   {:<18} {:>6} {:>18} {:>18} {:>18}",
        "Total",
        "",
        money.show(s.total_allocated),
        money.show(s.total_expended),
        money.show(s.total_remaining)
    );
    if !s.recorded_allocations.is_empty() {
        println!();
        println!(
            "   {} manually recorded allocation(s) listed for reference",
            s.recorded_allocations.len()
        );
    }
    println!();
}
