//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tillbook - Revenue, expenses and reserves for a small shop
#[derive(Parser)]
#[command(name = "tillbook")]
#[command(about = "Self-hosted bookkeeping for a retail shop", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (overrides the config file and TILLBOOK_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (defaults to ~/.config/tillbook/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and create the first admin
    Init {
        /// Admin username
        #[arg(long, default_value = "admin")]
        username: String,

        /// Admin phone number
        #[arg(long)]
        phone: String,

        /// Admin display name
        #[arg(long, default_value = "Administrator")]
        name: String,

        /// Admin password (falls back to TILLBOOK_ADMIN_PASSWORD)
        #[arg(long, env = "TILLBOOK_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Start the web server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// Every request runs as a local admin.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show the dashboard for a month
    Dashboard {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
    },

    /// Monthly revenue
    Revenue {
        #[command(subcommand)]
        action: RevenueAction,
    },

    /// Operational expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Reserve allocation accounts
    Accounts {
        #[command(subcommand)]
        action: Option<AccountsAction>,
    },

    /// Reserve balances for a year
    Reserve {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Spending from reserve accounts
    Expenditure {
        #[command(subcommand)]
        action: ExpenditureAction,
    },

    /// Stock items
    Stock {
        /// Only show items at or below their minimum level
        #[arg(long)]
        low: bool,
    },

    /// System settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// User accounts
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Query a running server over HTTP
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },
}

#[derive(Subcommand)]
pub enum RevenueAction {
    /// Record revenue for a month (replaces any existing value)
    Set {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        month: u32,

        /// Amount, e.g. 1500000 or 1.500.000
        amount: String,
    },

    /// List revenue for a year
    List {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record an expense
    Add {
        /// What the money was spent on
        name: String,

        /// Amount, e.g. 250000 or 250.000
        amount: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Record as a draft (excluded from totals)
        #[arg(long)]
        draft: bool,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List expenses for a year
    List {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Narrow to one month
        #[arg(long)]
        month: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List allocation accounts
    List {
        /// Include deactivated accounts
        #[arg(long)]
        all: bool,
    },

    /// Add an allocation account
    Add {
        name: String,

        /// Share of monthly net profit, 0-100
        percentage: String,

        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ExpenditureAction {
    /// Record spending from a reserve account
    Add {
        name: String,

        /// Allocation account the money comes from
        #[arg(long)]
        account: String,

        amount: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List expenditures for a year
    List {
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show all settings
    Show,

    /// Store a setting
    Set { key: String, value: String },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    List,

    /// Add a user
    Add {
        username: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        name: String,

        /// Password (falls back to TILLBOOK_NEW_PASSWORD)
        #[arg(long, env = "TILLBOOK_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
}

#[derive(Subcommand)]
pub enum RemoteAction {
    /// Fetch the dashboard from a running server
    Dashboard {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,

        /// Username or phone
        #[arg(long)]
        login: String,

        /// Password (falls back to TILLBOOK_PASSWORD)
        #[arg(long, env = "TILLBOOK_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        month: Option<u32>,
    },
}
