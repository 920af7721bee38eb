//! Tillbook Core Library
//!
//! Shared functionality for the Tillbook shop bookkeeping service:
//! - Database access and migrations
//! - Revenue/expense aggregation
//! - Reserve allocation engine and expenditure ledger
//! - Money parsing and display formatting
//! - Field validation
//! - Configuration (config file and stored system settings)
//! - Retrying HTTP client for a running server

pub mod aggregation;
pub mod allocation;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod money;
pub mod period;
pub mod retry;
pub mod validate;

pub use aggregation::PeriodSummary;
pub use allocation::{AccountAllocation, MonthlyNet};
pub use client::ApiClient;
pub use config::{AppConfig, SystemSettings};
pub use db::Database;
pub use error::{Error, Result};
pub use ledger::{AccountBalance, ExpenditureSummary, ReserveSummary};
pub use money::NumberFormat;
pub use period::Period;
pub use validate::{FieldError, Validator};
