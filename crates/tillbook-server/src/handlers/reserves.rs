//! Reserve fund handlers: allocation accounts, recorded allocations,
//! expenditures and summaries

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use tillbook_core::models::{
    AllocationAccount, AllocationAccountUpdate, NewAllocationAccount, NewReserveAllocation,
    NewReserveExpenditure, ReserveAllocation, ReserveExpenditure, ReserveExpenditureUpdate,
};
use tillbook_core::period::parse_date;
use tillbook_core::{ExpenditureSummary, ReserveSummary, Validator};

use super::{current_year, number_format, AmountInput};
use crate::{current_user, parse_body, AppError, AppState, SuccessResponse};

/// Query parameters carrying an optional fiscal year
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

/// Query parameters for listing allocation accounts
#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

// ========== Allocation accounts ==========

/// Request body for creating an allocation account
#[derive(Debug, Deserialize)]
pub struct CreateAllocationAccountRequest {
    pub name: String,
    pub description: Option<String>,
    pub percentage: Decimal,
}

/// Request body for updating an allocation account
#[derive(Debug, Deserialize)]
pub struct UpdateAllocationAccountRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub percentage: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// GET /api/settings/allocation-accounts - List allocation accounts
pub async fn list_allocation_accounts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AccountListQuery>,
) -> Result<Json<Vec<AllocationAccount>>, AppError> {
    Ok(Json(
        state.db.list_allocation_accounts(params.include_inactive)?,
    ))
}

/// POST /api/settings/allocation-accounts - Create an allocation account (admin)
///
/// Percentages are checked individually; their sum across accounts is not.
pub async fn create_allocation_account(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AllocationAccount>, AppError> {
    let user = current_user(&request)?;
    user.require_admin()?;
    let req: CreateAllocationAccountRequest = parse_body(request).await?;

    Validator::new()
        .required("name", &req.name)
        .percentage("percentage", req.percentage)
        .finish()?;

    let account = state.db.create_allocation_account(&NewAllocationAccount {
        name: req.name.trim().to_string(),
        description: req.description,
        percentage: req.percentage,
    })?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("allocation_account"),
        Some(account.id),
        Some(&format!("name={}, percentage={}", account.name, account.percentage)),
    )?;

    Ok(Json(account))
}

/// PUT /api/settings/allocation-accounts/:id - Update an allocation account (admin)
pub async fn update_allocation_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<AllocationAccount>, AppError> {
    let user = current_user(&request)?;
    user.require_admin()?;
    let req: UpdateAllocationAccountRequest = parse_body(request).await?;

    let mut v = Validator::new();
    v.not_blank("name", req.name.as_deref());
    if let Some(pct) = req.percentage {
        v.percentage("percentage", pct);
    }
    v.finish()?;

    let account = state.db.update_allocation_account(
        id,
        &AllocationAccountUpdate {
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
            percentage: req.percentage,
            is_active: req.is_active,
        },
    )?;

    state.db.log_audit(
        &user.username,
        "update",
        Some("allocation_account"),
        Some(id),
        None,
    )?;

    Ok(Json(account))
}

/// DELETE /api/settings/allocation-accounts/:id - Deactivate an allocation account (admin)
pub async fn delete_allocation_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = current_user(&request)?;
    user.require_admin()?;

    state.db.deactivate_allocation_account(id)?;

    state.db.log_audit(
        &user.username,
        "deactivate",
        Some("allocation_account"),
        Some(id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}

// ========== Recorded allocations ==========

/// Request body for recording an allocation entry
#[derive(Debug, Deserialize)]
pub struct CreateReserveAllocationRequest {
    pub year: i32,
    pub month: u32,
    pub account_type: String,
    pub amount: AmountInput,
    pub notes: Option<String>,
}

/// GET /api/reserve-allocations?year= - List recorded allocation entries
pub async fn list_reserve_allocations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<YearQuery>,
) -> Result<Json<Vec<ReserveAllocation>>, AppError> {
    let year = params.year.unwrap_or_else(current_year);
    Ok(Json(state.db.list_reserve_allocations(year)?))
}

/// POST /api/reserve-allocations - Record an allocation entry
pub async fn create_reserve_allocation(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ReserveAllocation>, AppError> {
    let user = current_user(&request)?;
    let req: CreateReserveAllocationRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    v.year("year", req.year)
        .month("month", req.month)
        .required("account_type", &req.account_type);
    let amount = v.amount("amount", &req.amount.raw(), &fmt);
    v.finish()?;
    let amount = amount.ok_or_else(|| AppError::bad_request("Invalid amount"))?;

    let allocation = state.db.create_reserve_allocation(&NewReserveAllocation {
        year: req.year,
        month: req.month,
        account_type: req.account_type.trim().to_string(),
        amount,
        notes: req.notes,
    })?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("reserve_allocation"),
        Some(allocation.id),
        Some(&format!(
            "{}-{:02} {} amount={}",
            allocation.year, allocation.month, allocation.account_type, allocation.amount
        )),
    )?;

    Ok(Json(allocation))
}

/// DELETE /api/reserve-allocations/:id - Delete a recorded allocation entry
pub async fn delete_reserve_allocation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = current_user(&request)?;

    state.db.delete_reserve_allocation(id)?;

    state.db.log_audit(
        &user.username,
        "delete",
        Some("reserve_allocation"),
        Some(id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/reserve-allocations/summary?year= - Allocated, expended and
/// remaining per reserve account
pub async fn reserve_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<YearQuery>,
) -> Result<Json<ReserveSummary>, AppError> {
    let year = params.year.unwrap_or_else(current_year);
    Ok(Json(state.db.reserve_summary(year)?))
}

// ========== Expenditures ==========

/// Request body for recording an expenditure
#[derive(Debug, Deserialize)]
pub struct CreateReserveExpenditureRequest {
    pub name: String,
    pub source_type: String,
    pub amount: AmountInput,
    pub expenditure_date: String,
    pub notes: Option<String>,
}

/// Request body for updating an expenditure
#[derive(Debug, Deserialize)]
pub struct UpdateReserveExpenditureRequest {
    pub name: Option<String>,
    pub source_type: Option<String>,
    pub amount: Option<AmountInput>,
    pub expenditure_date: Option<String>,
    pub notes: Option<String>,
}

/// GET /api/reserve-expenditures?year= - List expenditures for a year
pub async fn list_reserve_expenditures(
    State(state): State<Arc<AppState>>,
    Query(params): Query<YearQuery>,
) -> Result<Json<Vec<ReserveExpenditure>>, AppError> {
    let year = params.year.unwrap_or_else(current_year);
    Ok(Json(state.db.list_reserve_expenditures(year)?))
}

/// GET /api/reserve-expenditures/summary/:year - Expenditure totals
pub async fn expenditure_summary(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Result<Json<ExpenditureSummary>, AppError> {
    Ok(Json(state.db.expenditure_summary(year)?))
}

/// POST /api/reserve-expenditures - Record money drawn from a reserve
pub async fn create_reserve_expenditure(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ReserveExpenditure>, AppError> {
    let user = current_user(&request)?;
    let req: CreateReserveExpenditureRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    v.required("name", &req.name)
        .required("source_type", &req.source_type);
    let amount = v.amount("amount", &req.amount.raw(), &fmt);
    let date = parse_date(&req.expenditure_date).ok();
    v.check(
        date.is_some(),
        "expenditure_date",
        "must be a date in YYYY-MM-DD form",
    );
    v.finish()?;

    let (Some(amount), Some(expenditure_date)) = (amount, date) else {
        return Err(AppError::bad_request("Invalid expenditure"));
    };

    let expenditure = state
        .db
        .create_reserve_expenditure(&NewReserveExpenditure {
            name: req.name.trim().to_string(),
            source_type: req.source_type.trim().to_string(),
            amount,
            expenditure_date,
            notes: req.notes,
        })?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("reserve_expenditure"),
        Some(expenditure.id),
        Some(&format!(
            "source={}, amount={}",
            expenditure.source_type, expenditure.amount
        )),
    )?;

    Ok(Json(expenditure))
}

/// PUT /api/reserve-expenditures/:id - Update an expenditure
pub async fn update_reserve_expenditure(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<ReserveExpenditure>, AppError> {
    let user = current_user(&request)?;
    let req: UpdateReserveExpenditureRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    v.not_blank("name", req.name.as_deref())
        .not_blank("source_type", req.source_type.as_deref());
    let raw_amount = req.amount.as_ref().map(AmountInput::raw);
    let amount = v.optional_amount("amount", raw_amount.as_deref(), &fmt);
    let date = match req.expenditure_date.as_deref() {
        Some(raw) => {
            let parsed = parse_date(raw).ok();
            v.check(
                parsed.is_some(),
                "expenditure_date",
                "must be a date in YYYY-MM-DD form",
            );
            parsed
        }
        None => None,
    };
    v.finish()?;

    let expenditure = state.db.update_reserve_expenditure(
        id,
        &ReserveExpenditureUpdate {
            name: req.name.map(|n| n.trim().to_string()),
            source_type: req.source_type.map(|s| s.trim().to_string()),
            amount,
            expenditure_date: date,
            notes: req.notes,
        },
    )?;

    state.db.log_audit(
        &user.username,
        "update",
        Some("reserve_expenditure"),
        Some(id),
        None,
    )?;

    Ok(Json(expenditure))
}

/// DELETE /api/reserve-expenditures/:id - Delete an expenditure
pub async fn delete_reserve_expenditure(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = current_user(&request)?;

    state.db.delete_reserve_expenditure(id)?;

    state.db.log_audit(
        &user.username,
        "delete",
        Some("reserve_expenditure"),
        Some(id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}
