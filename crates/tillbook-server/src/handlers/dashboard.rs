//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Datelike;
use serde::Deserialize;

use tillbook_core::models::Dashboard;

use crate::{AppError, AppState};

/// Query parameters for the dashboard; both default to today
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// GET /api/dashboard?year=&month= - Focus month, annual totals and reserves
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, AppError> {
    let today = chrono::Local::now().date_naive();
    let year = params.year.unwrap_or(today.year());
    let month = params.month.unwrap_or(today.month());

    Ok(Json(state.db.dashboard(year, month)?))
}
