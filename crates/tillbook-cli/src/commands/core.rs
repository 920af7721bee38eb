//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `Money` - Amount parsing and display with the stored number format
//! - `cmd_init` - Initialize the database and the first admin

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use tillbook_core::models::{NewUser, Role};
use tillbook_core::money::format_money;
use tillbook_core::period::parse_date;
use tillbook_core::{Database, NumberFormat, Validator};

/// Username recorded in the audit log for CLI writes
pub const CLI_USER: &str = "cli";

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Today's (year, month)
pub fn current_period() -> (i32, u32) {
    let today = chrono::Local::now().date_naive();
    (today.year(), today.month())
}

/// Parse a `YYYY-MM-DD` argument, defaulting to today
pub fn date_or_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Amount parsing and display using the shop's stored number format
pub struct Money {
    pub currency: String,
    pub format: NumberFormat,
}

impl Money {
    pub fn load(db: &Database) -> Result<Self> {
        let settings = db.system_settings()?;
        Ok(Self {
            format: settings.number_format(),
            currency: settings.currency,
        })
    }

    /// Accepts canonical ("1500000.50") or display ("1.500.000,50") input
    pub fn parse(&self, field: &str, raw: &str) -> Result<Decimal> {
        let mut v = Validator::new();
        let amount = v.amount(field, raw, &self.format);
        v.finish()?;
        amount.with_context(|| format!("Invalid {}: {}", field, raw))
    }

    pub fn show(&self, amount: Decimal) -> String {
        format_money(amount, &self.currency, &self.format)
    }
}

pub fn cmd_init(db_path: &Path, username: &str, phone: &str, name: &str, password: &str) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    let existing = db.count_users()?;
    if existing > 0 {
        println!("   {} user(s) already exist, skipping admin creation", existing);
    } else {
        let mut v = Validator::new();
        v.username("username", username)
            .phone("phone", phone)
            .required("name", name)
            .password("password", password);
        v.finish()?;

        let user = db
            .create_user(&NewUser {
                phone: phone.to_string(),
                username: username.to_string(),
                name: name.to_string(),
                password: password.to_string(),
                role: Role::Admin,
            })
            .context("Failed to create admin user")?;
        db.log_audit(CLI_USER, "create", Some("user"), Some(user.id), Some("initial admin"))?;
        println!("   👤 Created admin '{}'", user.username);
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add allocation accounts: tillbook accounts add Savings 10");
    println!("  2. Start web UI: tillbook serve");

    Ok(())
}
