//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use tillbook_core::models::{Expense, ExpenseStatus, ExpenseUpdate, NewExpense};
use tillbook_core::period::parse_date;
use tillbook_core::{Period, PeriodSummary, Validator};

use super::{number_format, AmountInput};
use crate::{current_user, parse_body, AppError, AppState, SuccessResponse};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    pub month: Option<u32>,
    pub status: Option<String>,
}

/// Query parameters for expense summaries
#[derive(Debug, Deserialize)]
pub struct ExpenseSummaryQuery {
    pub month: Option<u32>,
}

/// Request body for creating an expense. Year and month are derived from
/// `expense_date`.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub name: String,
    pub category: Option<String>,
    pub amount: AmountInput,
    pub expense_date: String,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Request body for updating an expense (all fields optional)
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub amount: Option<AmountInput>,
    pub expense_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

fn parse_status(v: &mut Validator, raw: Option<&str>) -> Option<ExpenseStatus> {
    let raw = raw?;
    match raw.parse::<ExpenseStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            v.error("status", "must be 'spent' or 'draft'");
            None
        }
    }
}

fn parse_date_field(v: &mut Validator, field: &str, raw: &str) -> Option<chrono::NaiveDate> {
    match parse_date(raw) {
        Ok(date) => Some(date),
        Err(_) => {
            v.error(field, "must be a date in YYYY-MM-DD form");
            None
        }
    }
}

/// GET /api/expenses/:year?month=&status= - List expenses
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let mut v = Validator::new();
    if let Some(month) = params.month {
        v.month("month", month);
    }
    let status = parse_status(&mut v, params.status.as_deref());
    v.finish()?;

    Ok(Json(state.db.list_expenses(year, params.month, status)?))
}

/// GET /api/expenses/:year/summary?month= - Spent total vs the prior period
pub async fn expense_summary(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
    Query(params): Query<ExpenseSummaryQuery>,
) -> Result<Json<PeriodSummary>, AppError> {
    let period = Period::new(year, params.month)?;
    Ok(Json(state.db.expense_summary(period)?))
}

/// POST /api/expenses - Create an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let user = current_user(&request)?;
    let req: CreateExpenseRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    v.required("name", &req.name);
    let amount = v.amount("amount", &req.amount.raw(), &fmt);
    let expense_date = parse_date_field(&mut v, "expense_date", &req.expense_date);
    let status = parse_status(&mut v, req.status.as_deref());
    v.finish()?;

    let (Some(amount), Some(expense_date)) = (amount, expense_date) else {
        return Err(AppError::bad_request("Invalid expense"));
    };

    let expense = state.db.create_expense(&NewExpense {
        name: req.name.trim().to_string(),
        category: req.category,
        amount,
        expense_date,
        status: status.unwrap_or_default(),
        notes: req.notes,
    })?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!("name={}, amount={}", expense.name, expense.amount)),
    )?;

    Ok(Json(expense))
}

/// PUT /api/expenses/:id - Update an expense
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let user = current_user(&request)?;
    let req: UpdateExpenseRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    v.not_blank("name", req.name.as_deref());
    let raw_amount = req.amount.as_ref().map(AmountInput::raw);
    let amount = v.optional_amount("amount", raw_amount.as_deref(), &fmt);
    let expense_date = req
        .expense_date
        .as_deref()
        .and_then(|raw| parse_date_field(&mut v, "expense_date", raw));
    let status = parse_status(&mut v, req.status.as_deref());
    v.finish()?;

    let expense = state.db.update_expense(
        id,
        &ExpenseUpdate {
            name: req.name.map(|n| n.trim().to_string()),
            category: req.category,
            amount,
            expense_date,
            status,
            notes: req.notes,
        },
    )?;

    state.db.log_audit(
        &user.username,
        "update",
        Some("expense"),
        Some(id),
        None,
    )?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = current_user(&request)?;

    state.db.delete_expense(id)?;

    state
        .db
        .log_audit(&user.username, "delete", Some("expense"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
