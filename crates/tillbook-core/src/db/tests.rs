//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::period::Period;
    use chrono::NaiveDate;
    use rusqlite::params;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(name: &str, amount: &str, on: NaiveDate, status: ExpenseStatus) -> NewExpense {
        NewExpense {
            name: name.to_string(),
            category: Some("Supplies".to_string()),
            amount: dec(amount),
            expense_date: on,
            status,
            notes: None,
        }
    }

    fn account(name: &str, pct: &str) -> NewAllocationAccount {
        NewAllocationAccount {
            name: name.to_string(),
            description: None,
            percentage: dec(pct),
        }
    }

    fn new_user(username: &str, phone: &str, role: Role) -> NewUser {
        NewUser {
            phone: phone.to_string(),
            username: username.to_string(),
            name: username.to_uppercase(),
            password: "correct horse".to_string(),
            role,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_revenues(2024).unwrap().is_empty());
        assert!(db.list_allocation_accounts(true).unwrap().is_empty());
    }

    #[test]
    fn test_schema_has_money_columns_as_text() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();
        let kind: String = conn
            .query_row(
                "SELECT type FROM pragma_table_info('revenues') WHERE name = 'amount'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(kind, "TEXT");
    }

    // ========== Revenues ==========

    #[test]
    fn test_revenue_upsert_last_write_wins() {
        let db = Database::in_memory().unwrap();
        let first = db.upsert_revenue(2024, 3, dec("500")).unwrap();
        let second = db.upsert_revenue(2024, 3, dec("750.25")).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.amount, dec("750.25"));
        assert_eq!(db.list_revenues(2024).unwrap().len(), 1);
    }

    #[test]
    fn test_revenue_rejects_bad_month() {
        let db = Database::in_memory().unwrap();
        let err = db.upsert_revenue(2024, 13, dec("1")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_update_missing_revenue_is_not_found() {
        let db = Database::in_memory().unwrap();
        let err = db.update_revenue(99, dec("1")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_annual_revenue_is_decimal_exact() {
        let db = Database::in_memory().unwrap();
        db.upsert_revenue(2024, 1, dec("1000000.00")).unwrap();
        db.upsert_revenue(2024, 2, dec("0.005")).unwrap();

        let summary = db.revenue_summary(Period::new(2024, None).unwrap()).unwrap();
        assert_eq!(summary.total, dec("1000000.005"));
        assert_eq!(summary.count, 2);
        // Nothing recorded for 2023
        assert_eq!(summary.previous_total, Decimal::ZERO);
        assert_eq!(summary.change_percent, Decimal::ZERO);
    }

    #[test]
    fn test_january_compares_with_previous_december() {
        let db = Database::in_memory().unwrap();
        db.upsert_revenue(2023, 12, dec("200")).unwrap();
        db.upsert_revenue(2024, 1, dec("300")).unwrap();

        let summary = db
            .revenue_summary(Period::new(2024, Some(1)).unwrap())
            .unwrap();
        assert_eq!(summary.total, dec("300"));
        assert_eq!(summary.previous_total, dec("200"));
        assert_eq!(summary.change_percent, dec("50"));
    }

    // ========== Expenses ==========

    #[test]
    fn test_expense_period_follows_date() {
        let db = Database::in_memory().unwrap();
        let created = db
            .create_expense(&expense("Rent", "1500", date(2024, 1, 31), ExpenseStatus::Spent))
            .unwrap();
        assert_eq!((created.year, created.month), (2024, 1));

        let moved = db
            .update_expense(
                created.id,
                &ExpenseUpdate {
                    expense_date: Some(date(2024, 2, 1)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!((moved.year, moved.month), (2024, 2));
        assert_eq!(moved.name, "Rent");
        assert_eq!(moved.amount, dec("1500"));
    }

    #[test]
    fn test_drafts_excluded_from_totals() {
        let db = Database::in_memory().unwrap();
        db.create_expense(&expense("Paper", "100", date(2024, 5, 2), ExpenseStatus::Spent))
            .unwrap();
        db.create_expense(&expense("Shelves", "900", date(2024, 5, 3), ExpenseStatus::Draft))
            .unwrap();

        let summary = db
            .expense_summary(Period::new(2024, Some(5)).unwrap())
            .unwrap();
        assert_eq!(summary.total, dec("100"));
        assert_eq!(summary.count, 1);

        assert_eq!(db.list_expenses(2024, Some(5), None).unwrap().len(), 2);
        let drafts = db
            .list_expenses(2024, None, Some(ExpenseStatus::Draft))
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "Shelves");
    }

    #[test]
    fn test_delete_expense() {
        let db = Database::in_memory().unwrap();
        let created = db
            .create_expense(&expense("Ink", "20", date(2024, 4, 4), ExpenseStatus::Spent))
            .unwrap();
        db.delete_expense(created.id).unwrap();
        assert!(db.get_expense(created.id).unwrap().is_none());

        let err = db.delete_expense(created.id).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_resync_expense_periods() {
        let db = Database::in_memory().unwrap();
        let created = db
            .create_expense(&expense("Tape", "5", date(2024, 7, 9), ExpenseStatus::Spent))
            .unwrap();
        db.conn()
            .unwrap()
            .execute(
                "UPDATE expenses SET year = 1999, month = 1 WHERE id = ?",
                params![created.id],
            )
            .unwrap();

        assert_eq!(db.resync_expense_periods().unwrap(), 1);
        let fixed = db.get_expense(created.id).unwrap().unwrap();
        assert_eq!((fixed.year, fixed.month), (2024, 7));
        assert_eq!(db.resync_expense_periods().unwrap(), 0);
    }

    // ========== Reserves ==========

    #[test]
    fn test_allocation_account_name_conflict() {
        let db = Database::in_memory().unwrap();
        db.create_allocation_account(&account("Savings", "10")).unwrap();
        let err = db
            .create_allocation_account(&account("Savings", "20"))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_deactivated_account_hidden_from_active_list() {
        let db = Database::in_memory().unwrap();
        let savings = db.create_allocation_account(&account("Savings", "10")).unwrap();
        db.create_allocation_account(&account("Emergency", "5")).unwrap();

        db.deactivate_allocation_account(savings.id).unwrap();

        let active = db.list_allocation_accounts(false).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Emergency");
        assert_eq!(db.list_allocation_accounts(true).unwrap().len(), 2);
    }

    #[test]
    fn test_reserve_summary_full_year_allocation() {
        let db = Database::in_memory().unwrap();
        for month in 1..=12 {
            db.upsert_revenue(2024, month, dec("1000000")).unwrap();
        }
        db.create_allocation_account(&account("Renovation", "30")).unwrap();

        let summary = db.reserve_summary(2024).unwrap();
        assert_eq!(summary.allocations.len(), 1);
        assert_eq!(summary.allocations[0].allocated, dec("3600000"));
        assert_eq!(summary.total_allocated, dec("3600000"));
        assert_eq!(summary.total_remaining, dec("3600000"));
    }

    #[test]
    fn test_loss_month_contributes_nothing() {
        let db = Database::in_memory().unwrap();
        db.upsert_revenue(2024, 6, dec("100")).unwrap();
        db.create_expense(&expense("Repairs", "150", date(2024, 6, 10), ExpenseStatus::Spent))
            .unwrap();
        db.create_allocation_account(&account("Savings", "20")).unwrap();

        let summary = db.reserve_summary(2024).unwrap();
        assert_eq!(summary.monthly_net[5].net_profit, dec("-50"));
        assert_eq!(summary.allocations[0].monthly[5], Decimal::ZERO);
        assert_eq!(summary.allocations[0].allocated, Decimal::ZERO);
    }

    #[test]
    fn test_overspent_reserve_goes_negative() {
        let db = Database::in_memory().unwrap();
        db.upsert_revenue(2024, 1, dec("10000000")).unwrap();
        db.create_allocation_account(&account("Renovation", "10")).unwrap();
        db.create_reserve_expenditure(&NewReserveExpenditure {
            name: "New counter".to_string(),
            source_type: "Renovation".to_string(),
            amount: dec("1500000"),
            expenditure_date: date(2024, 3, 15),
            notes: None,
        })
        .unwrap();

        let summary = db.reserve_summary(2024).unwrap();
        let balance = &summary.balances[0];
        assert_eq!(balance.allocated, dec("1000000"));
        assert_eq!(balance.expended, dec("1500000"));
        assert_eq!(balance.remaining, dec("-500000"));
    }

    #[test]
    fn test_over_allocation_is_accepted() {
        let db = Database::in_memory().unwrap();
        db.upsert_revenue(2024, 1, dec("1000")).unwrap();
        db.create_allocation_account(&account("A", "70")).unwrap();
        db.create_allocation_account(&account("B", "50")).unwrap();

        let summary = db.reserve_summary(2024).unwrap();
        assert_eq!(summary.total_allocated, dec("1200"));
    }

    #[test]
    fn test_recorded_allocations_do_not_feed_balances() {
        let db = Database::in_memory().unwrap();
        db.create_allocation_account(&account("Savings", "10")).unwrap();
        let recorded = db
            .create_reserve_allocation(&NewReserveAllocation {
                year: 2024,
                month: 2,
                account_type: "Savings".to_string(),
                amount: dec("999"),
                notes: Some("manual".to_string()),
            })
            .unwrap();

        let summary = db.reserve_summary(2024).unwrap();
        assert_eq!(summary.recorded_allocations.len(), 1);
        assert_eq!(summary.total_allocated, Decimal::ZERO);

        db.delete_reserve_allocation(recorded.id).unwrap();
        assert!(db.list_reserve_allocations(2024).unwrap().is_empty());
    }

    #[test]
    fn test_expenditure_listing_is_year_scoped() {
        let db = Database::in_memory().unwrap();
        for (day, year) in [(31, 2023), (1, 2024)] {
            let month = if year == 2023 { 12 } else { 1 };
            db.create_reserve_expenditure(&NewReserveExpenditure {
                name: format!("Spend {}", year),
                source_type: "Savings".to_string(),
                amount: dec("10"),
                expenditure_date: date(year, month, day),
                notes: None,
            })
            .unwrap();
        }

        let rows = db.list_reserve_expenditures(2024).unwrap();
        assert_eq!(rows.len(), 1);
        let summary = db.expenditure_summary(2024).unwrap();
        assert_eq!(summary.total_expended, dec("10"));
        assert_eq!(summary.monthly_expenditure[0].total, dec("10"));
    }

    #[test]
    fn test_update_expenditure_partial() {
        let db = Database::in_memory().unwrap();
        let created = db
            .create_reserve_expenditure(&NewReserveExpenditure {
                name: "Fridge".to_string(),
                source_type: "Equipment".to_string(),
                amount: dec("400"),
                expenditure_date: date(2024, 8, 1),
                notes: Some("Two-door".to_string()),
            })
            .unwrap();

        let updated = db
            .update_reserve_expenditure(
                created.id,
                &ReserveExpenditureUpdate {
                    amount: Some(dec("450")),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, dec("450"));
        assert_eq!(updated.name, "Fridge");
        assert_eq!(updated.notes.as_deref(), Some("Two-door"));

        // A blank value clears an optional field
        let cleared = db
            .update_reserve_expenditure(
                created.id,
                &ReserveExpenditureUpdate {
                    notes: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.notes, None);
        assert_eq!(cleared.amount, dec("450"));

        let err = db
            .update_reserve_expenditure(created.id + 100, &ReserveExpenditureUpdate::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    // ========== Stock ==========

    fn stock_item(db: &Database, name: &str, stock: &str, min: &str) -> StockItem {
        db.create_stock_item(&NewStockItem {
            name: name.to_string(),
            unit: "pcs".to_string(),
            unit_price: dec("2500"),
            current_stock: dec(stock),
            min_stock: dec(min),
        })
        .unwrap()
    }

    #[test]
    fn test_stock_movements_adjust_level() {
        let db = Database::in_memory().unwrap();
        let item = stock_item(&db, "Rice", "10", "2");

        db.record_stock_transaction(
            item.id,
            &NewStockTransaction {
                kind: StockMovement::In,
                quantity: dec("5"),
                price: dec("2400"),
                date: date(2024, 1, 2),
                notes: None,
            },
        )
        .unwrap();
        db.record_stock_transaction(
            item.id,
            &NewStockTransaction {
                kind: StockMovement::Out,
                quantity: dec("12"),
                price: dec("3000"),
                date: date(2024, 1, 3),
                notes: None,
            },
        )
        .unwrap();

        let item = db.get_stock_item(item.id).unwrap().unwrap();
        assert_eq!(item.current_stock, dec("3"));

        let history = db.price_history(item.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].price, dec("2400"));
        assert_eq!(history[1].kind, StockMovement::Out);

        let listed = db.list_stock_transactions(item.id).unwrap();
        assert_eq!(listed[0].date, date(2024, 1, 3));
    }

    #[test]
    fn test_stock_out_beyond_level_rejected() {
        let db = Database::in_memory().unwrap();
        let item = stock_item(&db, "Sugar", "4", "1");

        let err = db
            .record_stock_transaction(
                item.id,
                &NewStockTransaction {
                    kind: StockMovement::Out,
                    quantity: dec("5"),
                    price: dec("1000"),
                    date: date(2024, 2, 1),
                    notes: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        // Rolled back: no transaction row, level unchanged
        assert!(db.list_stock_transactions(item.id).unwrap().is_empty());
        let item = db.get_stock_item(item.id).unwrap().unwrap();
        assert_eq!(item.current_stock, dec("4"));
    }

    #[test]
    fn test_low_stock_items() {
        let db = Database::in_memory().unwrap();
        stock_item(&db, "Flour", "1", "5");
        stock_item(&db, "Salt", "50", "5");
        let retired = stock_item(&db, "Yeast", "0", "3");
        db.deactivate_stock_item(retired.id).unwrap();

        let low = db.low_stock_items().unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Flour");
    }

    // ========== Reference data ==========

    #[test]
    fn test_reference_soft_delete() {
        let db = Database::in_memory().unwrap();
        let category = db
            .create_category(&ReferenceFields {
                name: Some("Utilities".to_string()),
                ..Default::default()
            })
            .unwrap();
        db.deactivate_category(category.id).unwrap();

        assert!(db.list_categories().unwrap().is_empty());
        let kept = db.get_category(category.id).unwrap().unwrap();
        assert!(!kept.is_active);
    }

    #[test]
    fn test_reference_requires_name() {
        let db = Database::in_memory().unwrap();
        let err = db
            .create_branch(&ReferenceFields {
                name: Some("  ".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_shareholder_update() {
        let db = Database::in_memory().unwrap();
        let holder = db
            .create_shareholder(&ReferenceFields {
                name: Some("Ani".to_string()),
                share_percentage: Some(dec("40")),
                ..Default::default()
            })
            .unwrap();
        let updated = db
            .update_shareholder(
                holder.id,
                &ReferenceFields {
                    phone: Some("08123456789".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.share_percentage, dec("40"));
        assert_eq!(updated.phone.as_deref(), Some("08123456789"));
    }

    // ========== Users & sessions ==========

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret", "not-a-hash"));
    }

    #[test]
    fn test_authenticate_by_username_or_phone() {
        let db = Database::in_memory().unwrap();
        let user = db
            .create_user(&new_user("kasir", "0811111111", Role::User))
            .unwrap();

        assert_eq!(db.authenticate("kasir", "correct horse").unwrap().id, user.id);
        assert_eq!(
            db.authenticate("0811111111", "correct horse").unwrap().id,
            user.id
        );
        assert!(matches!(
            db.authenticate("kasir", "nope").unwrap_err(),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            db.authenticate("ghost", "correct horse").unwrap_err(),
            Error::Unauthorized(_)
        ));
    }

    #[test]
    fn test_duplicate_username_conflicts() {
        let db = Database::in_memory().unwrap();
        db.create_user(&new_user("owner", "0800000001", Role::Admin))
            .unwrap();
        let err = db
            .create_user(&new_user("owner", "0800000002", Role::User))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_session_lifecycle() {
        let db = Database::in_memory().unwrap();
        let user = db
            .create_user(&new_user("owner", "0800000001", Role::Admin))
            .unwrap();

        let session = db.create_session(user.id, 12).unwrap();
        let resolved = db.session_user(&session.token).unwrap().unwrap();
        assert_eq!(resolved.username, "owner");

        // Only the digest is stored
        let stored: i64 = db
            .conn()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM sessions WHERE token_hash = ?",
                params![session.token],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stored, 0);

        db.delete_session(&session.token).unwrap();
        assert!(db.session_user(&session.token).unwrap().is_none());
    }

    #[test]
    fn test_expired_session_rejected_and_purged() {
        let db = Database::in_memory().unwrap();
        let user = db
            .create_user(&new_user("owner", "0800000001", Role::Admin))
            .unwrap();
        let session = db.create_session(user.id, -1).unwrap();

        assert!(db.session_user(&session.token).unwrap().is_none());
        assert_eq!(db.purge_expired_sessions().unwrap(), 1);
    }

    #[test]
    fn test_password_change_ends_sessions() {
        let db = Database::in_memory().unwrap();
        let user = db
            .create_user(&new_user("owner", "0800000001", Role::Admin))
            .unwrap();
        let session = db.create_session(user.id, 12).unwrap();

        db.update_user(
            user.id,
            &UserUpdate {
                password: Some("new password".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(db.session_user(&session.token).unwrap().is_none());
        assert!(db.authenticate("owner", "new password").is_ok());
    }

    #[test]
    fn test_last_admin_is_protected() {
        let db = Database::in_memory().unwrap();
        let admin = db
            .create_user(&new_user("owner", "0800000001", Role::Admin))
            .unwrap();

        assert!(matches!(
            db.delete_user(admin.id).unwrap_err(),
            Error::Conflict(_)
        ));
        assert!(matches!(
            db.update_user(
                admin.id,
                &UserUpdate {
                    role: Some(Role::User),
                    ..Default::default()
                }
            )
            .unwrap_err(),
            Error::Conflict(_)
        ));

        let clerk = db
            .create_user(&new_user("clerk", "0800000002", Role::User))
            .unwrap();
        db.delete_user(clerk.id).unwrap();
        assert_eq!(db.count_users().unwrap(), 1);
    }

    // ========== Settings & audit ==========

    #[test]
    fn test_settings_defaults_and_overrides() {
        let db = Database::in_memory().unwrap();
        let defaults = db.system_settings().unwrap();
        assert_eq!(defaults.currency, "Rp");

        db.set_setting("currency", "IDR").unwrap();
        db.set_setting("receipt_footer", "Terima kasih").unwrap();
        let settings = db.system_settings().unwrap();
        assert_eq!(settings.currency, "IDR");
        assert_eq!(settings.extra["receipt_footer"], "Terima kasih");
        assert_eq!(db.get_setting("currency").unwrap().as_deref(), Some("IDR"));
    }

    #[test]
    fn test_invalid_separator_rejected() {
        let db = Database::in_memory().unwrap();
        let err = db.set_setting("thousands_separator", "..").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(db.get_setting("thousands_separator").unwrap().is_none());
    }

    #[test]
    fn test_audit_log_newest_first() {
        let db = Database::in_memory().unwrap();
        db.log_audit("owner", "create", Some("expense"), Some(1), None)
            .unwrap();
        db.log_audit("owner", "delete", Some("expense"), Some(1), Some("typo"))
            .unwrap();

        let entries = db.list_audit_log(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "delete");
        assert_eq!(entries[0].details.as_deref(), Some("typo"));
        assert_eq!(db.list_audit_log(1).unwrap().len(), 1);
    }

    // ========== Dashboard ==========

    #[test]
    fn test_dashboard_bundle() {
        let db = Database::in_memory().unwrap();
        db.upsert_revenue(2024, 2, dec("800")).unwrap();
        db.upsert_revenue(2024, 3, dec("1000")).unwrap();
        db.create_expense(&expense("Rent", "300", date(2024, 3, 1), ExpenseStatus::Spent))
            .unwrap();
        db.create_allocation_account(&account("Savings", "10")).unwrap();
        stock_item(&db, "Oil", "0", "1");

        let dashboard = db.dashboard(2024, 3).unwrap();
        assert_eq!(dashboard.currency, "Rp");
        assert_eq!(dashboard.revenue.total, dec("1000"));
        assert_eq!(dashboard.revenue.change_percent, dec("25"));
        assert_eq!(dashboard.net_profit, dec("700"));
        assert_eq!(dashboard.annual_net_profit, dec("1500"));
        assert_eq!(dashboard.monthly.len(), 12);
        assert_eq!(dashboard.reserve_balances[0].allocated, dec("150"));
        assert_eq!(dashboard.low_stock_items, 1);
    }

    #[test]
    fn test_dashboard_rejects_bad_month() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            db.dashboard(2024, 0).unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[test]
    fn test_oversized_stored_amounts_are_invalid_data() {
        // Rows written before amounts were bounded, or edited by hand
        let db = Database::in_memory().unwrap();
        db.upsert_revenue(2024, 1, Decimal::MAX).unwrap();
        db.create_allocation_account(&account("Savings", "50")).unwrap();
        assert!(matches!(
            db.reserve_summary(2024).unwrap_err(),
            Error::InvalidData(_)
        ));

        db.upsert_revenue(2024, 2, Decimal::MAX).unwrap();
        assert!(matches!(
            db.revenue_summary(Period::new(2024, None).unwrap())
                .unwrap_err(),
            Error::InvalidData(_)
        ));
        assert!(matches!(
            db.dashboard(2024, 1).unwrap_err(),
            Error::InvalidData(_)
        ));
    }

    #[test]
    fn test_stock_level_overflow_rejected() {
        let db = Database::in_memory().unwrap();
        let item = stock_item(&db, "Sugar", "79228162514264337593543950335", "0");
        let movement = NewStockTransaction {
            kind: StockMovement::In,
            quantity: Decimal::MAX,
            price: dec("15000"),
            date: date(2024, 1, 2),
            notes: None,
        };
        assert!(matches!(
            db.record_stock_transaction(item.id, &movement).unwrap_err(),
            Error::InvalidData(_)
        ));
        let item = db.get_stock_item(item.id).unwrap().unwrap();
        assert_eq!(item.current_stock, Decimal::MAX);
    }
}
