//! CLI command tests

use rust_decimal::Decimal;
use tillbook_core::models::{ExpenseStatus, Role};
use tillbook_core::Database;

use crate::commands::{self, truncate, Money};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

// ========== Shared helpers ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a rather long name", 10), "a rathe...");
    // Multi-byte names are cut on character boundaries
    assert_eq!(truncate("Kopi Susu Gula Aren", 8), "Kopi ...");
}

#[test]
fn test_money_parse_uses_stored_format() {
    let db = setup_test_db();
    let money = Money::load(&db).unwrap();
    assert_eq!(
        money.parse("amount", "1.234.567").unwrap(),
        Decimal::from(1_234_567)
    );
    assert_eq!(money.show(Decimal::from(1_234_567)), "Rp 1.234.567");
    assert!(money.parse("amount", "-10").is_err());
    assert!(money.parse("amount", "ten").is_err());
}

#[test]
fn test_date_or_today() {
    let date = commands::date_or_today(Some("2024-02-29")).unwrap();
    assert_eq!(date.to_string(), "2024-02-29");
    assert!(commands::date_or_today(Some("29/02/2024")).is_err());
    assert!(commands::date_or_today(None).is_ok());
}

// ========== Init ==========

#[test]
fn test_cmd_init_creates_admin_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.db");

    commands::cmd_init(&path, "owner", "0811000001", "Owner", "owner-pass").unwrap();
    // Second run keeps the existing admin
    commands::cmd_init(&path, "other", "0811000002", "Other", "other-pass").unwrap();

    let db = commands::open_db(&path).unwrap();
    let users = db.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "owner");
    assert_eq!(users[0].role, Role::Admin);
}

#[test]
fn test_cmd_init_rejects_short_password() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.db");

    let result = commands::cmd_init(&path, "owner", "0811000001", "Owner", "short");
    assert!(result.is_err());
}

// ========== Ledger ==========

#[test]
fn test_cmd_revenue_set_overwrites() {
    let db = setup_test_db();
    commands::cmd_revenue_set(&db, 2024, 3, "1.000.000").unwrap();
    commands::cmd_revenue_set(&db, 2024, 3, "1250000").unwrap();

    let revenues = db.list_revenues(2024).unwrap();
    assert_eq!(revenues.len(), 1);
    assert_eq!(revenues[0].amount, Decimal::from(1_250_000));

    assert!(commands::cmd_revenue_list(&db, Some(2024)).is_ok());
}

#[test]
fn test_cmd_revenue_set_bad_month() {
    let db = setup_test_db();
    assert!(commands::cmd_revenue_set(&db, 2024, 0, "100").is_err());
    assert!(db.list_revenues(2024).unwrap().is_empty());
}

#[test]
fn test_cmd_revenue_rejects_out_of_range_input() {
    let db = setup_test_db();
    assert!(commands::cmd_revenue_set(&db, 2024, 1, "79228162514264337593543950335").is_err());
    assert!(db.list_revenues(2024).unwrap().is_empty());
    assert!(commands::cmd_revenue_list(&db, Some(i32::MIN)).is_err());
}

#[test]
fn test_cmd_expense_add_and_list() {
    let db = setup_test_db();
    commands::cmd_expense_add(
        &db,
        "Electricity",
        "450.000",
        Some("2024-06-30"),
        Some("Utilities".to_string()),
        false,
        None,
    )
    .unwrap();
    commands::cmd_expense_add(&db, "Signboard", "900000", Some("2024-06-15"), None, true, None)
        .unwrap();

    let expenses = db.list_expenses(2024, Some(6), None).unwrap();
    assert_eq!(expenses.len(), 2);
    let draft = expenses.iter().find(|e| e.name == "Signboard").unwrap();
    assert_eq!(draft.status, ExpenseStatus::Draft);

    assert!(commands::cmd_expense_list(&db, Some(2024), Some(6)).is_ok());
    assert!(commands::cmd_expense_list(&db, Some(2024), Some(13)).is_err());
}

#[test]
fn test_cmd_accounts_add_validates_percentage() {
    let db = setup_test_db();
    commands::cmd_accounts_add(&db, "Savings", "12.5", None).unwrap();
    assert!(commands::cmd_accounts_add(&db, "Greedy", "150", None).is_err());
    assert!(commands::cmd_accounts_add(&db, "Typo", "ten", None).is_err());
    // Names are unique
    assert!(commands::cmd_accounts_add(&db, "Savings", "5", None).is_err());

    let accounts = db.list_allocation_accounts(false).unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].percentage, Decimal::new(125, 1));

    assert!(commands::cmd_accounts_list(&db, true).is_ok());
}

#[test]
fn test_cmd_expenditure_feeds_reserve_summary() {
    let db = setup_test_db();
    for month in 1..=12 {
        commands::cmd_revenue_set(&db, 2024, month, "1000000").unwrap();
    }
    commands::cmd_accounts_add(&db, "Renovation", "30", None).unwrap();
    commands::cmd_expenditure_add(
        &db,
        "Paint",
        "Renovation",
        "600000",
        Some("2024-08-01"),
        None,
    )
    .unwrap();

    let summary = db.reserve_summary(2024).unwrap();
    let renovation = summary
        .balances
        .iter()
        .find(|b| b.account == "Renovation")
        .unwrap();
    assert_eq!(renovation.allocated, Decimal::from(3_600_000));
    assert_eq!(renovation.remaining, Decimal::from(3_000_000));

    assert!(commands::cmd_reserve_summary(&db, Some(2024)).is_ok());
    assert!(commands::cmd_expenditure_list(&db, Some(2024)).is_ok());
}

#[test]
fn test_cli_writes_are_audited() {
    let db = setup_test_db();
    commands::cmd_revenue_set(&db, 2024, 1, "100").unwrap();

    let entries = db.list_audit_log(10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].username, commands::CLI_USER);
    assert_eq!(entries[0].entity_type.as_deref(), Some("revenue"));
}

// ========== Reports ==========

#[test]
fn test_cmd_dashboard() {
    let db = setup_test_db();
    commands::cmd_revenue_set(&db, 2024, 5, "1000").unwrap();
    assert!(commands::cmd_dashboard(&db, Some(2024), Some(5)).is_ok());
    assert!(commands::cmd_dashboard(&db, Some(2024), Some(13)).is_err());
}

#[test]
fn test_cmd_stock_list_empty() {
    let db = setup_test_db();
    assert!(commands::cmd_stock_list(&db, false).is_ok());
    assert!(commands::cmd_stock_list(&db, true).is_ok());
}

// ========== Admin ==========

#[test]
fn test_cmd_users_add() {
    let db = setup_test_db();
    commands::cmd_users_add(&db, "kasir", "0812000003", "Kasir", "kasir-pass", false).unwrap();
    assert!(
        commands::cmd_users_add(&db, "kasir", "0812000004", "Dup", "kasir-pass", false).is_err()
    );
    assert!(commands::cmd_users_add(&db, "x", "1", "", "short", true).is_err());

    let users = db.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, Role::User);
    assert!(commands::cmd_users_list(&db).is_ok());
}

#[test]
fn test_cmd_settings_set_changes_number_format() {
    let db = setup_test_db();
    commands::cmd_settings_set(&db, "thousands_separator", ",").unwrap();
    commands::cmd_settings_set(&db, "decimal_separator", ".").unwrap();
    commands::cmd_settings_set(&db, "currency", "IDR").unwrap();

    let money = Money::load(&db).unwrap();
    assert_eq!(money.show(Decimal::new(123456750, 2)), "IDR 1,234,567.50");
    assert!(commands::cmd_settings_show(&db).is_ok());

    assert!(commands::cmd_settings_set(&db, "decimal_separator", "12").is_err());
}
