//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, amount/date parsing)
//! - `ledger` - Revenue, expenses, allocation accounts and reserve expenditures
//! - `reports` - Dashboard and reserve summary
//! - `stock` - Stock listing
//! - `admin` - Users and system settings
//! - `serve` - Web server command
//! - `remote` - Commands against a running server

pub mod admin;
pub mod core;
pub mod ledger;
pub mod remote;
pub mod reports;
pub mod serve;
pub mod stock;

// Re-export command functions for main.rs
pub use admin::*;
pub use core::*;
pub use ledger::*;
pub use remote::*;
pub use reports::*;
pub use serve::*;
pub use stock::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
