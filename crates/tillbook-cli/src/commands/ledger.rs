//! Ledger commands: revenue, expenses, allocation accounts and expenditures

use anyhow::{bail, Result};
use rust_decimal::Decimal;

use tillbook_core::models::{ExpenseStatus, NewAllocationAccount, NewExpense, NewReserveExpenditure};
use tillbook_core::{Database, Period, Validator};

use super::{current_period, date_or_today, truncate, Money, CLI_USER};

pub fn cmd_revenue_set(db: &Database, year: i32, month: u32, amount: &str) -> Result<()> {
    let money = Money::load(db)?;
    let mut v = Validator::new();
    v.year("year", year).month("month", month);
    v.finish()?;
    let amount = money.parse("amount", amount)?;

    let revenue = db.upsert_revenue(year, month, amount)?;
    db.log_audit(
        CLI_USER,
        "upsert",
        Some("revenue"),
        Some(revenue.id),
        Some(&format!("{}-{:02} amount={}", year, month, amount)),
    )?;

    println!(
        "✅ Revenue for {}-{:02}: {}",
        year,
        month,
        money.show(revenue.amount)
    );
    Ok(())
}

pub fn cmd_revenue_list(db: &Database, year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or(current_period().0);
    let money = Money::load(db)?;
    let revenues = db.list_revenues(year)?;
    let summary = db.revenue_summary(Period::new(year, None)?)?;

    println!();
    println!("💵 Revenue {}", year);
    println!("   ─────────────────────────────");
    if revenues.is_empty() {
        println!("   (no revenue recorded)");
    }
    for r in &revenues {
        println!("   {:>2}  {:>20}", r.month, money.show(r.amount));
    }
    println!("   ─────────────────────────────");
    println!("   Total: {}", money.show(summary.total));
    println!(
        "   vs {}: {} ({}%)",
        year - 1,
        money.show(summary.previous_total),
        summary.change_percent
    );
    println!();
    Ok(())
}

pub fn cmd_expense_add(
    db: &Database,
    name: &str,
    amount: &str,
    date: Option<&str>,
    category: Option<String>,
    draft: bool,
    notes: Option<String>,
) -> Result<()> {
    let money = Money::load(db)?;
    let mut v = Validator::new();
    v.required("name", name);
    v.finish()?;
    let amount = money.parse("amount", amount)?;
    let expense_date = date_or_today(date)?;

    let expense = db.create_expense(&NewExpense {
        name: name.trim().to_string(),
        category,
        amount,
        expense_date,
        status: if draft {
            ExpenseStatus::Draft
        } else {
            ExpenseStatus::Spent
        },
        notes,
    })?;
    db.log_audit(
        CLI_USER,
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!("name={}, amount={}", expense.name, amount)),
    )?;

    println!(
        "✅ Expense #{} '{}' {} on {} ({})",
        expense.id,
        expense.name,
        money.show(expense.amount),
        expense.expense_date,
        expense.status
    );
    Ok(())
}

pub fn cmd_expense_list(db: &Database, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let year = year.unwrap_or(current_period().0);
    let money = Money::load(db)?;
    let period = Period::new(year, month)?;
    let expenses = db.list_expenses(year, month, None)?;
    let summary = db.expense_summary(period)?;

    println!();
    println!("🧾 Expenses {}", period);
    println!("   ─────────────────────────────────────────────────────────────");
    if expenses.is_empty() {
        println!("   (no expenses recorded)");
    }
    for e in &expenses {
        let marker = match e.status {
            ExpenseStatus::Draft => " (draft)",
            ExpenseStatus::Spent => "",
        };
        println!(
            "   {}  {:<30} {:>20}{}",
            e.expense_date,
            truncate(&e.name, 30),
            money.show(e.amount),
            marker
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Spent: {}", money.show(summary.total));
    println!();
    Ok(())
}

pub fn cmd_accounts_list(db: &Database, include_inactive: bool) -> Result<()> {
    let accounts = db.list_allocation_accounts(include_inactive)?;

    println!();
    println!("🏦 Allocation accounts");
    println!("   ─────────────────────────────");
    if accounts.is_empty() {
        println!("   (none - add one with: tillbook accounts add <name> <percentage>)");
    }
    let mut total = Decimal::ZERO;
    for a in &accounts {
        let status = if a.is_active { "" } else { " (inactive)" };
        println!("   #{:<3} {:<24} {:>6}%{}", a.id, a.name, a.percentage, status);
        if a.is_active {
            total += a.percentage;
        }
    }
    if total > Decimal::ONE_HUNDRED {
        println!();
        println!("   ⚠️  Active percentages add up to {}%", total);
    }
    println!();
    Ok(())
}

pub fn cmd_accounts_add(
    db: &Database,
    name: &str,
    percentage: &str,
    description: Option<String>,
) -> Result<()> {
    let Ok(percentage) = percentage.trim().parse::<Decimal>() else {
        bail!("Invalid percentage: {}", percentage);
    };
    let mut v = Validator::new();
    v.required("name", name).percentage("percentage", percentage);
    v.finish()?;

    let account = db.create_allocation_account(&NewAllocationAccount {
        name: name.trim().to_string(),
        description,
        percentage,
    })?;
    db.log_audit(
        CLI_USER,
        "create",
        Some("allocation_account"),
        Some(account.id),
        Some(&format!("name={}, percentage={}", account.name, percentage)),
    )?;

    println!("✅ Account '{}' receives {}% of monthly net profit", account.name, account.percentage);
    Ok(())
}

pub fn cmd_expenditure_add(
    db: &Database,
    name: &str,
    account: &str,
    amount: &str,
    date: Option<&str>,
    notes: Option<String>,
) -> Result<()> {
    let money = Money::load(db)?;
    let mut v = Validator::new();
    v.required("name", name).required("account", account);
    v.finish()?;
    let amount = money.parse("amount", amount)?;
    let expenditure_date = date_or_today(date)?;

    let known = db
        .list_allocation_accounts(true)?
        .iter()
        .any(|a| a.name == account.trim());
    if !known {
        println!("   ⚠️  '{}' is not an allocation account", account.trim());
    }

    let expenditure = db.create_reserve_expenditure(&NewReserveExpenditure {
        name: name.trim().to_string(),
        source_type: account.trim().to_string(),
        amount,
        expenditure_date,
        notes,
    })?;
    db.log_audit(
        CLI_USER,
        "create",
        Some("reserve_expenditure"),
        Some(expenditure.id),
        Some(&format!("source={}, amount={}", expenditure.source_type, amount)),
    )?;

    println!(
        "✅ Spent {} from '{}' on {}",
        money.show(expenditure.amount),
        expenditure.source_type,
        expenditure.expenditure_date
    );
    Ok(())
}

pub fn cmd_expenditure_list(db: &Database, year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or(current_period().0);
    let money = Money::load(db)?;
    let expenditures = db.list_reserve_expenditures(year)?;

    println!();
    println!("📤 Reserve expenditures {}", year);
    println!("   ─────────────────────────────────────────────────────────────");
    if expenditures.is_empty() {
        println!("   (none)");
    }
    for e in &expenditures {
        println!(
            "   {}  {:<24} {:<16} {:>20}",
            e.expenditure_date,
            truncate(&e.name, 24),
            truncate(&e.source_type, 16),
            money.show(e.amount)
        );
    }
    println!();
    Ok(())
}
