//! Tillbook CLI - Shop bookkeeping
//!
//! Usage:
//!   tillbook init --phone 0811...        Initialize database and first admin
//!   tillbook revenue set --year 2024 --month 1 1.500.000
//!   tillbook reserve --year 2024         Reserve balances
//!   tillbook serve --port 3000           Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tillbook_core::AppConfig;

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let db_path = cli.db.clone().unwrap_or_else(|| config.database.path.clone());

    match cli.command {
        Commands::Init {
            username,
            phone,
            name,
            password,
        } => commands::cmd_init(&db_path, &username, &phone, &name, &password),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            let mut server = config.server.clone();
            if let Some(port) = port {
                server.port = port;
            }
            if let Some(host) = host {
                server.host = host;
            }
            if no_auth {
                server.require_auth = false;
            }
            if static_dir.is_some() {
                server.static_dir = static_dir;
            }
            commands::cmd_serve(&db_path, &server).await
        }
        Commands::Dashboard { year, month } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_dashboard(&db, year, month)
        }
        Commands::Revenue { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                RevenueAction::Set {
                    year,
                    month,
                    amount,
                } => commands::cmd_revenue_set(&db, year, month, &amount),
                RevenueAction::List { year } => commands::cmd_revenue_list(&db, year),
            }
        }
        Commands::Expense { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                ExpenseAction::Add {
                    name,
                    amount,
                    date,
                    category,
                    draft,
                    notes,
                } => commands::cmd_expense_add(
                    &db,
                    &name,
                    &amount,
                    date.as_deref(),
                    category,
                    draft,
                    notes,
                ),
                ExpenseAction::List { year, month } => commands::cmd_expense_list(&db, year, month),
            }
        }
        Commands::Accounts { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None => commands::cmd_accounts_list(&db, false),
                Some(AccountsAction::List { all }) => commands::cmd_accounts_list(&db, all),
                Some(AccountsAction::Add {
                    name,
                    percentage,
                    description,
                }) => commands::cmd_accounts_add(&db, &name, &percentage, description),
            }
        }
        Commands::Reserve { year } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_reserve_summary(&db, year)
        }
        Commands::Expenditure { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                ExpenditureAction::Add {
                    name,
                    account,
                    amount,
                    date,
                    notes,
                } => commands::cmd_expenditure_add(
                    &db,
                    &name,
                    &account,
                    &amount,
                    date.as_deref(),
                    notes,
                ),
                ExpenditureAction::List { year } => commands::cmd_expenditure_list(&db, year),
            }
        }
        Commands::Stock { low } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_stock_list(&db, low)
        }
        Commands::Settings { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None | Some(SettingsAction::Show) => commands::cmd_settings_show(&db),
                Some(SettingsAction::Set { key, value }) => {
                    commands::cmd_settings_set(&db, &key, &value)
                }
            }
        }
        Commands::Users { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add {
                    username,
                    phone,
                    name,
                    password,
                    admin,
                }) => commands::cmd_users_add(&db, &username, &phone, &name, &password, admin),
            }
        }
        Commands::Remote { action } => match action {
            RemoteAction::Dashboard {
                url,
                login,
                password,
                year,
                month,
            } => commands::cmd_remote_dashboard(&url, &login, &password, year, month).await,
        },
    }
}
