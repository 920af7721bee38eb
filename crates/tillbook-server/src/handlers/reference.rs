//! Reference data handlers: categories, branches and shareholders

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use tillbook_core::models::{Branch, Category, ReferenceFields, Shareholder};
use tillbook_core::Validator;

use crate::{current_user, parse_body, AppError, AppState, SessionUser, SuccessResponse};

/// Request body shared by the reference-data create and update routes
#[derive(Debug, Default, Deserialize)]
pub struct ReferenceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub share_percentage: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl ReferenceRequest {
    fn validate(&self, creating: bool) -> Result<(), AppError> {
        let mut v = Validator::new();
        if creating {
            v.required("name", self.name.as_deref().unwrap_or(""));
        } else {
            v.not_blank("name", self.name.as_deref());
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            v.phone("phone", phone);
        }
        if let Some(pct) = self.share_percentage {
            v.percentage("share_percentage", pct);
        }
        v.finish()?;
        Ok(())
    }

    fn into_fields(self) -> ReferenceFields {
        ReferenceFields {
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description,
            address: self.address,
            phone: self.phone,
            share_percentage: self.share_percentage,
            is_active: self.is_active,
        }
    }
}

async fn read_request(request: Request, creating: bool) -> Result<(SessionUser, ReferenceFields), AppError> {
    let user = current_user(&request)?;
    let req: ReferenceRequest = parse_body(request).await?;
    req.validate(creating)?;
    Ok((user, req.into_fields()))
}

// ========== Categories ==========

/// GET /api/categories - List active categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.db.list_categories()?))
}

/// POST /api/categories - Create a category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Category>, AppError> {
    let (user, fields) = read_request(request, true).await?;
    let category = state.db.create_category(&fields)?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("category"),
        Some(category.id),
        Some(&format!("name={}", category.name)),
    )?;

    Ok(Json(category))
}

/// PUT /api/categories/:id - Update a category
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Category>, AppError> {
    let (user, fields) = read_request(request, false).await?;
    let category = state.db.update_category(id, &fields)?;

    state
        .db
        .log_audit(&user.username, "update", Some("category"), Some(id), None)?;

    Ok(Json(category))
}

/// DELETE /api/categories/:id - Deactivate a category
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = current_user(&request)?;
    state.db.deactivate_category(id)?;

    state
        .db
        .log_audit(&user.username, "deactivate", Some("category"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

// ========== Branches ==========

/// GET /api/branches - List active branches
pub async fn list_branches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Branch>>, AppError> {
    Ok(Json(state.db.list_branches()?))
}

/// POST /api/branches - Create a branch
pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Branch>, AppError> {
    let (user, fields) = read_request(request, true).await?;
    let branch = state.db.create_branch(&fields)?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("branch"),
        Some(branch.id),
        Some(&format!("name={}", branch.name)),
    )?;

    Ok(Json(branch))
}

/// PUT /api/branches/:id - Update a branch
pub async fn update_branch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Branch>, AppError> {
    let (user, fields) = read_request(request, false).await?;
    let branch = state.db.update_branch(id, &fields)?;

    state
        .db
        .log_audit(&user.username, "update", Some("branch"), Some(id), None)?;

    Ok(Json(branch))
}

/// DELETE /api/branches/:id - Deactivate a branch
pub async fn delete_branch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = current_user(&request)?;
    state.db.deactivate_branch(id)?;

    state
        .db
        .log_audit(&user.username, "deactivate", Some("branch"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

// ========== Shareholders ==========

/// GET /api/shareholders - List active shareholders
pub async fn list_shareholders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Shareholder>>, AppError> {
    Ok(Json(state.db.list_shareholders()?))
}

/// POST /api/shareholders - Create a shareholder
pub async fn create_shareholder(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Shareholder>, AppError> {
    let (user, fields) = read_request(request, true).await?;
    let shareholder = state.db.create_shareholder(&fields)?;

    state.db.log_audit(
        &user.username,
        "create",
        Some("shareholder"),
        Some(shareholder.id),
        Some(&format!(
            "name={}, share={}",
            shareholder.name, shareholder.share_percentage
        )),
    )?;

    Ok(Json(shareholder))
}

/// PUT /api/shareholders/:id - Update a shareholder
pub async fn update_shareholder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Shareholder>, AppError> {
    let (user, fields) = read_request(request, false).await?;
    let shareholder = state.db.update_shareholder(id, &fields)?;

    state
        .db
        .log_audit(&user.username, "update", Some("shareholder"), Some(id), None)?;

    Ok(Json(shareholder))
}

/// DELETE /api/shareholders/:id - Deactivate a shareholder
pub async fn delete_shareholder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = current_user(&request)?;
    state.db.deactivate_shareholder(id)?;

    state.db.log_audit(
        &user.username,
        "deactivate",
        Some("shareholder"),
        Some(id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}
