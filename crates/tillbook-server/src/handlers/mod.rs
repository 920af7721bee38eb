//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod reference;
pub mod reserves;
pub mod revenues;
pub mod settings;
pub mod stock;
pub mod users;

// Re-export all handlers for use in router
pub use audit::*;
pub use auth::*;
pub use dashboard::*;
pub use expenses::*;
pub use reference::*;
pub use reserves::*;
pub use revenues::*;
pub use settings::*;
pub use stock::*;
pub use users::*;

use serde::Deserialize;
use tillbook_core::money::NumberFormat;

use crate::{AppError, AppState};

/// A money amount as sent by a client: a JSON number or a string in either
/// canonical (`1234567.5`) or display (`1.234.567,5`) form
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl AmountInput {
    pub fn raw(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// The shop's configured number format, used to read display-form amounts
pub(crate) fn number_format(state: &AppState) -> Result<NumberFormat, AppError> {
    Ok(state.db.system_settings()?.number_format())
}

/// Current year, used when a query omits it
pub(crate) fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Local::now().year()
}
