//! Tillbook Web Server
//!
//! Axum-based REST API for the Tillbook shop bookkeeping service.
//!
//! Security features:
//! - Session authentication (secure by default, use --no-auth for local dev)
//! - Admin-only routes for user administration, settings and the audit log
//! - Restrictive CORS policy
//! - Audit logging for every write
//! - Sanitized error responses

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use tillbook_core::client::SESSION_COOKIE;
use tillbook_core::models::{Role, User};
use tillbook_core::Database;

mod handlers;

/// Maximum JSON request body size (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Maximum audit log page size
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Username recorded for requests when authentication is disabled
pub const LOCAL_DEV_USER: &str = "local-dev";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Lifetime of a login session
    pub session_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            session_ttl_hours: 12,
        }
    }
}

impl From<&tillbook_core::config::ServerSection> for ServerConfig {
    fn from(section: &tillbook_core::config::ServerSection) -> Self {
        Self {
            require_auth: section.require_auth,
            allowed_origins: section.allowed_origins.clone(),
            session_ttl_hours: section.session_ttl_hours,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// The caller of the current request, inserted by [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub username: String,
    pub role: Role,
    /// `None` when authentication is disabled
    pub user: Option<User>,
    /// Raw session token the request carried
    pub token: Option<String>,
}

impl SessionUser {
    fn local_dev() -> Self {
        Self {
            username: LOCAL_DEV_USER.to_string(),
            role: Role::Admin,
            user: None,
            token: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Reject non-admin callers with 403
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            warn!(user = %self.username, "Admin route refused");
            Err(AppError::forbidden("Admin role required"))
        }
    }
}

/// Pull the session token from the `Authorization: Bearer` header or the
/// session cookie, in that order
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Authentication middleware - resolves the session token to a user
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        request.extensions_mut().insert(SessionUser::local_dev());
        return next.run(request).await;
    }

    let Some(token) = session_token(request.headers()) else {
        warn!(path = %request.uri().path(), "Unauthorized request - no session");
        return AppError::unauthorized("Authentication required").into_response();
    };

    match state.db.session_user(&token) {
        Ok(Some(user)) => {
            tracing::debug!(user = %user.username, path = %request.uri().path(), "Authenticated via session");
            request.extensions_mut().insert(SessionUser {
                username: user.username.clone(),
                role: user.role,
                user: Some(user),
                token: Some(token),
            });
            next.run(request).await
        }
        Ok(None) => {
            warn!(path = %request.uri().path(), "Unauthorized request - invalid or expired session");
            AppError::unauthorized("Session expired or invalid").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// The authenticated caller, as inserted by the auth middleware
pub(crate) fn current_user(request: &Request) -> Result<SessionUser, AppError> {
    request
        .extensions()
        .get::<SessionUser>()
        .cloned()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}

/// Read and deserialize a JSON request body
pub(crate) async fn parse_body<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let bytes: Bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let protected = Router::new()
        // Auth
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::get_me))
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Revenues
        .route("/revenues", post(handlers::upsert_revenue))
        .route(
            "/revenues/:id",
            get(handlers::list_revenues).put(handlers::update_revenue),
        )
        .route("/revenues/:id/summary", get(handlers::revenue_summary))
        // Expenses
        .route("/expenses", post(handlers::create_expense))
        .route(
            "/expenses/:id",
            get(handlers::list_expenses)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        .route("/expenses/:id/summary", get(handlers::expense_summary))
        // Recorded reserve allocations
        .route(
            "/reserve-allocations",
            get(handlers::list_reserve_allocations).post(handlers::create_reserve_allocation),
        )
        .route(
            "/reserve-allocations/summary",
            get(handlers::reserve_summary),
        )
        .route(
            "/reserve-allocations/:id",
            axum::routing::delete(handlers::delete_reserve_allocation),
        )
        // Reserve expenditures
        .route(
            "/reserve-expenditures",
            get(handlers::list_reserve_expenditures).post(handlers::create_reserve_expenditure),
        )
        .route(
            "/reserve-expenditures/summary/:year",
            get(handlers::expenditure_summary),
        )
        .route(
            "/reserve-expenditures/:id",
            put(handlers::update_reserve_expenditure)
                .delete(handlers::delete_reserve_expenditure),
        )
        // Settings
        .route("/settings/system", get(handlers::get_system_settings))
        .route("/settings/system/:key", put(handlers::set_system_setting))
        .route(
            "/settings/allocation-accounts",
            get(handlers::list_allocation_accounts).post(handlers::create_allocation_account),
        )
        .route(
            "/settings/allocation-accounts/:id",
            put(handlers::update_allocation_account).delete(handlers::delete_allocation_account),
        )
        // Reference data
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/:id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route(
            "/branches",
            get(handlers::list_branches).post(handlers::create_branch),
        )
        .route(
            "/branches/:id",
            put(handlers::update_branch).delete(handlers::delete_branch),
        )
        .route(
            "/shareholders",
            get(handlers::list_shareholders).post(handlers::create_shareholder),
        )
        .route(
            "/shareholders/:id",
            put(handlers::update_shareholder).delete(handlers::delete_shareholder),
        )
        // Stock
        .route(
            "/stock/items",
            get(handlers::list_stock_items).post(handlers::create_stock_item),
        )
        .route("/stock/low", get(handlers::list_low_stock))
        .route(
            "/stock/items/:id",
            get(handlers::get_stock_item)
                .put(handlers::update_stock_item)
                .delete(handlers::delete_stock_item),
        )
        .route(
            "/stock/items/:id/transactions",
            get(handlers::list_stock_transactions).post(handlers::record_stock_transaction),
        )
        .route(
            "/stock/items/:id/price-history",
            get(handlers::get_price_history),
        )
        // Users
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // Audit log
        .route("/audit", get(handlers::list_audit_log))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/login", post(handlers::login))
        .merge(protected);

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    };

    // CSP: same-origin scripts, inline styles, data/blob images for the logo
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' blob: data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if db.count_users()? == 0 {
        warn!("⚠️  No users exist yet - run `tillbook init` to create an admin");
    }

    match db.purge_expired_sessions() {
        Ok(count) if count > 0 => info!("Purged {} expired session(s)", count),
        Ok(_) => {}
        Err(e) => warn!("Failed to purge expired sessions: {}", e),
    }

    // Expense periods are derived from dates; repair any drift before serving
    match db.resync_expense_periods() {
        Ok(count) if count > 0 => warn!("⚠️  Re-derived period for {} expense(s)", count),
        Ok(_) => {}
        Err(e) => warn!("Failed to check expense periods: {}", e),
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    fields: Option<BTreeMap<String, String>>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            fields: None,
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn forbidden(msg: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::new(StatusCode::CONFLICT, msg)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = match self.fields {
            Some(fields) => Json(serde_json::json!({
                "error": self.message,
                "fields": fields,
            })),
            None => Json(serde_json::json!({
                "error": self.message
            })),
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        use tillbook_core::Error as CoreError;

        let err = err.into();
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::Validation(fields)) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: "Validation failed".to_string(),
                fields: Some(
                    fields
                        .iter()
                        .map(|f| (f.field.clone(), f.message.clone()))
                        .collect(),
                ),
                internal: None,
            },
            Some(CoreError::NotFound(msg)) => Self::not_found(msg),
            Some(CoreError::Conflict(msg)) => Self::conflict(msg),
            Some(CoreError::InvalidData(msg)) => Self::bad_request(msg),
            Some(CoreError::Unauthorized(msg)) => Self::unauthorized(msg),
            _ => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                fields: None,
                // Keep full error for logging
                internal: Some(err),
            },
        }
    }
}

#[cfg(test)]
mod tests;
