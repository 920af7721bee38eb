//! Revenue handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use tillbook_core::models::Revenue;
use tillbook_core::{Period, PeriodSummary, Validator};

use super::{number_format, AmountInput};
use crate::{current_user, parse_body, AppError, AppState};

/// Request body for recording a month's revenue
#[derive(Debug, Deserialize)]
pub struct UpsertRevenueRequest {
    pub year: i32,
    pub month: u32,
    pub amount: AmountInput,
}

/// Request body for changing a revenue amount
#[derive(Debug, Deserialize)]
pub struct UpdateRevenueRequest {
    pub amount: AmountInput,
}

/// Query parameters for period summaries
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub month: Option<u32>,
}

/// GET /api/revenues/:year - List revenues for a year
pub async fn list_revenues(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<Revenue>>, AppError> {
    Ok(Json(state.db.list_revenues(year)?))
}

/// GET /api/revenues/:year/summary?month= - Revenue total vs the prior period
pub async fn revenue_summary(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<PeriodSummary>, AppError> {
    let period = Period::new(year, params.month)?;
    Ok(Json(state.db.revenue_summary(period)?))
}

/// POST /api/revenues - Create or replace the revenue for (year, month)
pub async fn upsert_revenue(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Revenue>, AppError> {
    let user = current_user(&request)?;
    let req: UpsertRevenueRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    v.year("year", req.year).month("month", req.month);
    let amount = v.amount("amount", &req.amount.raw(), &fmt);
    v.finish()?;
    let amount = amount.ok_or_else(|| AppError::bad_request("Invalid amount"))?;

    let revenue = state.db.upsert_revenue(req.year, req.month, amount)?;

    state.db.log_audit(
        &user.username,
        "upsert",
        Some("revenue"),
        Some(revenue.id),
        Some(&format!("{}-{:02} amount={}", req.year, req.month, amount)),
    )?;

    Ok(Json(revenue))
}

/// PUT /api/revenues/:id - Change the amount of a revenue row
pub async fn update_revenue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Revenue>, AppError> {
    let user = current_user(&request)?;
    let req: UpdateRevenueRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    let amount = v.amount("amount", &req.amount.raw(), &fmt);
    v.finish()?;
    let amount = amount.ok_or_else(|| AppError::bad_request("Invalid amount"))?;

    let revenue = state.db.update_revenue(id, amount)?;

    state.db.log_audit(
        &user.username,
        "update",
        Some("revenue"),
        Some(id),
        Some(&format!("amount={}", amount)),
    )?;

    Ok(Json(revenue))
}
