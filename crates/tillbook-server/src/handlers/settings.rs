//! System settings handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use serde::Deserialize;

use tillbook_core::SystemSettings;

use crate::{current_user, parse_body, AppError, AppState};

/// Request body for storing a setting
#[derive(Debug, Deserialize)]
pub struct SetSettingRequest {
    pub value: String,
}

/// GET /api/settings/system - All settings, with defaults filled in
pub async fn get_system_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SystemSettings>, AppError> {
    Ok(Json(state.db.system_settings()?))
}

/// PUT /api/settings/system/:key - Store one setting (admin)
pub async fn set_system_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    request: Request,
) -> Result<Json<SystemSettings>, AppError> {
    let user = current_user(&request)?;
    user.require_admin()?;
    let req: SetSettingRequest = parse_body(request).await?;

    state.db.set_setting(&key, req.value.trim())?;

    state.db.log_audit(
        &user.username,
        "update",
        Some("setting"),
        None,
        Some(&format!("{}={}", key, req.value.trim())),
    )?;

    Ok(Json(state.db.system_settings()?))
}
