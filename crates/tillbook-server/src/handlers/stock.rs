//! Stock item and movement handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use tillbook_core::models::{
    NewStockItem, NewStockTransaction, PricePoint, StockItem, StockItemUpdate, StockMovement,
    StockTransaction,
};
use tillbook_core::period::parse_date;
use tillbook_core::Validator;

use super::{number_format, AmountInput};
use crate::{current_user, parse_body, AppError, AppState, SuccessResponse};

/// Request body for creating a stock item
#[derive(Debug, Deserialize)]
pub struct CreateStockItemRequest {
    pub name: String,
    pub unit: String,
    pub unit_price: AmountInput,
    pub current_stock: Option<Decimal>,
    pub min_stock: Option<Decimal>,
}

/// Request body for updating a stock item. The stock level itself only
/// changes through transactions.
#[derive(Debug, Deserialize)]
pub struct UpdateStockItemRequest {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<AmountInput>,
    pub min_stock: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Request body for recording a stock movement
#[derive(Debug, Deserialize)]
pub struct StockTransactionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: Decimal,
    pub price: AmountInput,
    pub date: String,
    pub notes: Option<String>,
}

fn check_quantity(v: &mut Validator, field: &str, value: Option<Decimal>) {
    if let Some(q) = value {
        v.quantity(field, q);
    }
}

/// GET /api/stock/items - List active stock items
pub async fn list_stock_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StockItem>>, AppError> {
    Ok(Json(state.db.list_stock_items()?))
}

/// GET /api/stock/low - Items at or below their minimum level
pub async fn list_low_stock(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StockItem>>, AppError> {
    Ok(Json(state.db.low_stock_items()?))
}

/// GET /api/stock/items/:id - Get a stock item
pub async fn get_stock_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<StockItem>, AppError> {
    let item = state
        .db
        .get_stock_item(id)?
        .ok_or_else(|| AppError::not_found(&format!("Stock item {} not found", id)))?;
    Ok(Json(item))
}

/// POST /api/stock/items - Create a stock item
pub async fn create_stock_item(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<StockItem>, AppError> {
    let user = current_user(&request)?;
    let req: CreateStockItemRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    v.required("name", &req.name).required("unit", &req.unit);
    let unit_price = v.amount("unit_price", &req.unit_price.raw(), &fmt);
    check_quantity(&mut v, "current_stock", req.current_stock);
    check_quantity(&mut v, "min_stock", req.min_stock);
    v.finish()?;
    let unit_price = unit_price.ok_or_else(|| AppError::bad_request("Invalid unit price"))?;

    let item = state.db.create_stock_item(&NewStockItem {
        name: req.name.trim().to_string(),
        unit: req.unit.trim().to_string(),
        unit_price,
        current_stock: req.current_stock.unwrap_or(Decimal::ZERO),
        min_stock: req.min_stock.unwrap_or(Decimal::ZERO),
    })?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("stock_item"),
        Some(item.id),
        Some(&format!("name={}", item.name)),
    )?;

    Ok(Json(item))
}

/// PUT /api/stock/items/:id - Update a stock item
pub async fn update_stock_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<StockItem>, AppError> {
    let user = current_user(&request)?;
    let req: UpdateStockItemRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    v.not_blank("name", req.name.as_deref())
        .not_blank("unit", req.unit.as_deref());
    let raw_price = req.unit_price.as_ref().map(AmountInput::raw);
    let unit_price = v.optional_amount("unit_price", raw_price.as_deref(), &fmt);
    check_quantity(&mut v, "min_stock", req.min_stock);
    v.finish()?;

    let item = state.db.update_stock_item(
        id,
        &StockItemUpdate {
            name: req.name.map(|n| n.trim().to_string()),
            unit: req.unit.map(|u| u.trim().to_string()),
            unit_price,
            min_stock: req.min_stock,
            is_active: req.is_active,
        },
    )?;

    state
        .db
        .log_audit(&user.username, "update", Some("stock_item"), Some(id), None)?;

    Ok(Json(item))
}

/// DELETE /api/stock/items/:id - Deactivate a stock item
pub async fn delete_stock_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = current_user(&request)?;

    state.db.deactivate_stock_item(id)?;

    state.db.log_audit(
        &user.username,
        "deactivate",
        Some("stock_item"),
        Some(id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/stock/items/:id/transactions - Movements for an item
pub async fn list_stock_transactions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<StockTransaction>>, AppError> {
    Ok(Json(state.db.list_stock_transactions(id)?))
}

/// POST /api/stock/items/:id/transactions - Record a stock movement
pub async fn record_stock_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<StockTransaction>, AppError> {
    let user = current_user(&request)?;
    let req: StockTransactionRequest = parse_body(request).await?;
    let fmt = number_format(&state)?;

    let mut v = Validator::new();
    let kind = req.kind.parse::<StockMovement>().ok();
    v.check(kind.is_some(), "type", "must be 'in' or 'out'");
    if req.quantity > Decimal::ZERO {
        v.quantity("quantity", req.quantity);
    } else {
        v.error("quantity", "must be greater than zero");
    }
    let price = v.amount("price", &req.price.raw(), &fmt);
    let date = parse_date(&req.date).ok();
    v.check(date.is_some(), "date", "must be a date in YYYY-MM-DD form");
    v.finish()?;

    let (Some(kind), Some(price), Some(date)) = (kind, price, date) else {
        return Err(AppError::bad_request("Invalid stock transaction"));
    };

    let transaction = state.db.record_stock_transaction(
        id,
        &NewStockTransaction {
            kind,
            quantity: req.quantity,
            price,
            date,
            notes: req.notes,
        },
    )?;

    state.db.log_audit(
        &user.username,
        "record",
        Some("stock_transaction"),
        Some(transaction.id),
        Some(&format!(
            "item={}, type={}, quantity={}",
            id,
            kind.as_str(),
            req.quantity
        )),
    )?;

    Ok(Json(transaction))
}

/// GET /api/stock/items/:id/price-history - Prices over time for an item
pub async fn get_price_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<PricePoint>>, AppError> {
    if state.db.get_stock_item(id)?.is_none() {
        return Err(AppError::not_found(&format!("Stock item {} not found", id)));
    }
    Ok(Json(state.db.price_history(id)?))
}
