//! Authentication and health handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use tillbook_core::client::SESSION_COOKIE;
use tillbook_core::models::{Role, User};
use tillbook_core::Validator;

use crate::{current_user, parse_body, AppError, AppState, SuccessResponse};

/// GET /api/health - Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Request body for logging in
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or phone number
    pub login: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// POST /api/auth/login - Verify credentials and start a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let req: LoginRequest = parse_body(request).await?;

    Validator::new()
        .required("login", &req.login)
        .required("password", &req.password)
        .finish()?;

    let user = state.db.authenticate(req.login.trim(), &req.password)?;
    let ttl = state.config.session_ttl_hours;
    let session = state.db.create_session(user.id, ttl)?;

    state
        .db
        .log_audit(&user.username, "login", Some("session"), Some(user.id), None)?;
    info!(user = %user.username, "Logged in");

    let cookie = session_cookie(&session.token, ttl * 3600);
    let body = LoginResponse {
        token: session.token,
        user: session.user,
        expires_at: session.expires_at,
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// POST /api/auth/logout - End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let user = current_user(&request)?;

    if let Some(token) = &user.token {
        state.db.delete_session(token)?;
        state
            .db
            .log_audit(&user.username, "logout", Some("session"), None, None)?;
    }

    Ok((
        [(header::SET_COOKIE, session_cookie("", 0))],
        Json(SuccessResponse { success: true }),
    )
        .into_response())
}

/// Response for the /api/auth/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    pub username: String,
    pub role: Role,
    /// Full user record; absent when authentication is disabled
    pub user: Option<User>,
    /// How the user was authenticated
    pub auth_method: String,
}

/// GET /api/auth/me - The currently authenticated user
pub async fn get_me(request: Request) -> Result<Json<MeResponse>, AppError> {
    let session = current_user(&request)?;
    let auth_method = if session.token.is_some() {
        "session"
    } else {
        "none"
    };

    Ok(Json(MeResponse {
        username: session.username,
        role: session.role,
        user: session.user,
        auth_method: auth_method.to_string(),
    }))
}
