//! User administration handlers (admin only)

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use serde::Deserialize;

use tillbook_core::models::{NewUser, Role, User, UserUpdate};
use tillbook_core::Validator;

use crate::{current_user, parse_body, AppError, AppState, SessionUser, SuccessResponse};

/// Request body for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub phone: String,
    pub username: String,
    pub name: String,
    pub password: String,
    pub role: Option<String>,
}

/// Request body for updating a user
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub phone: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

fn parse_role(v: &mut Validator, raw: Option<&str>) -> Option<Role> {
    let raw = raw?;
    match raw.parse::<Role>() {
        Ok(role) => Some(role),
        Err(_) => {
            v.error("role", "must be 'admin' or 'user'");
            None
        }
    }
}

fn admin(request: &Request) -> Result<SessionUser, AppError> {
    let user = current_user(request)?;
    user.require_admin()?;
    Ok(user)
}

/// GET /api/users - List users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<User>>, AppError> {
    admin(&request)?;
    Ok(Json(state.db.list_users()?))
}

/// GET /api/users/:id - Get a user
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<User>, AppError> {
    admin(&request)?;
    let user = state
        .db
        .get_user(id)?
        .ok_or_else(|| AppError::not_found(&format!("User {} not found", id)))?;
    Ok(Json(user))
}

/// POST /api/users - Create a user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<User>, AppError> {
    let caller = admin(&request)?;
    let req: CreateUserRequest = parse_body(request).await?;

    let mut v = Validator::new();
    v.username("username", req.username.trim())
        .phone("phone", req.phone.trim())
        .required("name", &req.name);
    v.password("password", &req.password);
    let role = parse_role(&mut v, req.role.as_deref());
    v.finish()?;

    let user = state.db.create_user(&NewUser {
        phone: req.phone.trim().to_string(),
        username: req.username.trim().to_string(),
        name: req.name.trim().to_string(),
        password: req.password,
        role: role.unwrap_or_default(),
    })?;

    state.db.log_audit(
        &caller.username,
        "create",
        Some("user"),
        Some(user.id),
        Some(&format!("username={}, role={}", user.username, user.role)),
    )?;

    Ok(Json(user))
}

/// PUT /api/users/:id - Update a user
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<User>, AppError> {
    let caller = admin(&request)?;
    let req: UpdateUserRequest = parse_body(request).await?;

    let mut v = Validator::new();
    if let Some(username) = req.username.as_deref() {
        v.username("username", username.trim());
    }
    if let Some(phone) = req.phone.as_deref() {
        v.phone("phone", phone.trim());
    }
    v.not_blank("name", req.name.as_deref());
    if let Some(password) = req.password.as_deref() {
        v.password("password", password);
    }
    let role = parse_role(&mut v, req.role.as_deref());
    v.finish()?;

    let password_changed = req.password.is_some();
    let user = state.db.update_user(
        id,
        &UserUpdate {
            phone: req.phone.map(|p| p.trim().to_string()),
            username: req.username.map(|u| u.trim().to_string()),
            name: req.name.map(|n| n.trim().to_string()),
            password: req.password,
            role,
        },
    )?;

    state.db.log_audit(
        &caller.username,
        "update",
        Some("user"),
        Some(id),
        password_changed.then_some("password changed"),
    )?;

    Ok(Json(user))
}

/// DELETE /api/users/:id - Delete a user
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let caller = admin(&request)?;

    if caller.user.as_ref().is_some_and(|u| u.id == id) {
        return Err(AppError::conflict("Cannot delete your own account"));
    }

    state.db.delete_user(id)?;

    state
        .db
        .log_audit(&caller.username, "delete", Some("user"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
