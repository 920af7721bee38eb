//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use std::str::FromStr;
use tillbook_core::models::NewUser;
use tillbook_core::money::format_amount;
use tillbook_core::NumberFormat;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: false,
        ..Default::default()
    };
    create_router(db, None, config)
}

/// App with authentication on, an admin "owner" and a plain user "clerk"
fn setup_auth_app() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    db.create_user(&NewUser {
        phone: "0811000001".to_string(),
        username: "owner".to_string(),
        name: "Owner".to_string(),
        password: "owner-pass".to_string(),
        role: Role::Admin,
    })
    .unwrap();
    db.create_user(&NewUser {
        phone: "0811000002".to_string(),
        username: "clerk".to_string(),
        name: "Clerk".to_string(),
        password: "clerk-pass".to_string(),
        role: Role::User,
    })
    .unwrap();
    let app = create_router(db.clone(), None, ServerConfig::default());
    (app, db)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn dec(value: &serde_json::Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/auth/login",
        Some(serde_json::json!({ "login": username, "password": password })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    json["token"].as_str().unwrap().to_string()
}

// ========== Auth ==========

#[tokio::test]
async fn test_health_is_public() {
    let (app, _db) = setup_auth_app();
    let response = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_requires_session() {
    let (app, _db) = setup_auth_app();
    let response = send(&app, "GET", "/api/dashboard", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "GET", "/api/dashboard", None, Some("bogus")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_sets_cookie_and_me_works() {
    let (app, _db) = setup_auth_app();

    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(serde_json::json!({ "login": "0811000001", "password": "owner-pass" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("tillbook_session="));
    assert!(cookie.contains("HttpOnly"));

    let json = get_body_json(response).await;
    assert_eq!(json["user"]["username"], "owner");
    assert!(json["user"].get("password_hash").is_none());

    // The cookie alone authenticates
    let pair = cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .uri("/api/auth/me")
        .header("cookie", pair)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me = get_body_json(response).await;
    assert_eq!(me["username"], "owner");
    assert_eq!(me["role"], "admin");
    assert_eq!(me["auth_method"], "session");
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let (app, _db) = setup_auth_app();
    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(serde_json::json!({ "login": "owner", "password": "nope" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app, _db) = setup_auth_app();
    let token = login(&app, "owner", "owner-pass").await;

    let response = send(&app, "POST", "/api/auth/logout", None, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_users() {
    let (app, _db) = setup_auth_app();
    let token = login(&app, "clerk", "clerk-pass").await;

    let response = send(&app, "GET", "/api/users", None, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        "POST",
        "/api/settings/allocation-accounts",
        Some(serde_json::json!({ "name": "Savings", "percentage": "10" })),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "GET", "/api/audit", None, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Bookkeeping is open to every signed-in user
    let response = send(&app, "GET", "/api/revenues/2024", None, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_writes_are_audited_with_username() {
    let (app, db) = setup_auth_app();
    let token = login(&app, "clerk", "clerk-pass").await;

    let response = send(
        &app,
        "POST",
        "/api/revenues",
        Some(serde_json::json!({ "year": 2024, "month": 1, "amount": "500" })),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let entries = db.list_audit_log(10).unwrap();
    assert!(entries
        .iter()
        .any(|e| e.username == "clerk" && e.action == "upsert"));
}

// ========== Revenues ==========

#[tokio::test]
async fn test_revenue_upsert_accepts_display_format() {
    let app = setup_test_app();

    let response = send(
        &app,
        "POST",
        "/api/revenues",
        Some(serde_json::json!({ "year": 2024, "month": 2, "amount": "1.234.567" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(dec(&json["amount"]), Decimal::from(1_234_567));

    // Second write for the same month replaces the first
    let response = send(
        &app,
        "POST",
        "/api/revenues",
        Some(serde_json::json!({ "year": 2024, "month": 2, "amount": 1000 })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/revenues/2024", None, None).await;
    let json = get_body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(dec(&rows[0]["amount"]), Decimal::from(1000));
}

#[tokio::test]
async fn test_revenue_summary_month_over_month() {
    let app = setup_test_app();
    for (month, amount) in [(1, "200"), (2, "300")] {
        send(
            &app,
            "POST",
            "/api/revenues",
            Some(serde_json::json!({ "year": 2024, "month": month, "amount": amount })),
            None,
        )
        .await;
    }

    let response = send(&app, "GET", "/api/revenues/2024/summary?month=2", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(dec(&json["total"]), Decimal::from(300));
    assert_eq!(dec(&json["previous_total"]), Decimal::from(200));
    assert_eq!(dec(&json["change_percent"]), Decimal::from(50));
    assert_eq!(json["period"]["kind"], "month");
}

#[tokio::test]
async fn test_revenue_validation_errors() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/api/revenues",
        Some(serde_json::json!({ "year": 2024, "month": 13, "amount": "-5" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = get_body_json(response).await;
    assert!(json["fields"]["month"].is_string());
    assert!(json["fields"]["amount"].is_string());
}

#[tokio::test]
async fn test_update_missing_revenue_is_404() {
    let app = setup_test_app();
    let response = send(
        &app,
        "PUT",
        "/api/revenues/42",
        Some(serde_json::json!({ "amount": "10" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Expenses ==========

#[tokio::test]
async fn test_expense_crud_and_draft_exclusion() {
    let app = setup_test_app();

    let response = send(
        &app,
        "POST",
        "/api/expenses",
        Some(serde_json::json!({
            "name": "Rent",
            "amount": "1500",
            "expense_date": "2024-03-31",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rent = get_body_json(response).await;
    assert_eq!(rent["year"], 2024);
    assert_eq!(rent["month"], 3);
    assert_eq!(rent["status"], "spent");

    send(
        &app,
        "POST",
        "/api/expenses",
        Some(serde_json::json!({
            "name": "New shelves",
            "amount": "900",
            "expense_date": "2024-03-10",
            "status": "draft",
        })),
        None,
    )
    .await;

    let response = send(&app, "GET", "/api/expenses/2024?month=3", None, None).await;
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let response = send(&app, "GET", "/api/expenses/2024?status=draft", None, None).await;
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let response = send(&app, "GET", "/api/expenses/2024/summary?month=3", None, None).await;
    let json = get_body_json(response).await;
    assert_eq!(dec(&json["total"]), Decimal::from(1500));

    // Moving the date moves the period
    let id = rent["id"].as_i64().unwrap();
    let response = send(
        &app,
        "PUT",
        &format!("/api/expenses/{}", id),
        Some(serde_json::json!({ "expense_date": "2024-04-01" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["month"], 4);

    let response = send(&app, "DELETE", &format!("/api/expenses/{}", id), None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, "DELETE", &format!("/api/expenses/{}", id), None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expense_field_errors() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/api/expenses",
        Some(serde_json::json!({
            "name": " ",
            "amount": "abc",
            "expense_date": "31/03/2024",
            "status": "pending",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = get_body_json(response).await;
    let fields = json["fields"].as_object().unwrap();
    for field in ["name", "amount", "expense_date", "status"] {
        assert!(fields.contains_key(field), "missing error for {}", field);
    }
}

#[tokio::test]
async fn test_expense_display_amount_round_trip() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/api/expenses",
        Some(serde_json::json!({
            "name": "Stock purchase",
            "amount": "1.234.567",
            "expense_date": "2024-07-12",
            "notes": "Supplier A",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = get_body_json(response).await;
    let stored = dec(&created["amount"]);
    assert_eq!(stored, Decimal::from(1_234_567));
    assert_eq!(
        format_amount(stored, &NumberFormat::default()),
        "1.234.567"
    );

    let response = send(&app, "GET", "/api/expenses/2024?month=7", None, None).await;
    let json = get_body_json(response).await;
    assert_eq!(dec(&json[0]["amount"]), Decimal::from(1_234_567));

    // Omitted fields are kept, a blank one is cleared
    let id = created["id"].as_i64().unwrap();
    let response = send(
        &app,
        "PUT",
        &format!("/api/expenses/{}", id),
        Some(serde_json::json!({ "notes": "" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["notes"].is_null());
    assert_eq!(dec(&json["amount"]), Decimal::from(1_234_567));
}

#[tokio::test]
async fn test_oversized_amounts_rejected() {
    let app = setup_test_app();
    let huge = "79228162514264337593543950335";

    let response = send(
        &app,
        "POST",
        "/api/revenues",
        Some(serde_json::json!({ "year": 2024, "month": 1, "amount": huge })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = get_body_json(response).await;
    assert!(json["fields"]["amount"].is_string());

    let response = send(
        &app,
        "POST",
        "/api/expenses",
        Some(serde_json::json!({
            "name": "Typo",
            "amount": "12,50001",
            "expense_date": "2024-01-02",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send(
        &app,
        "POST",
        "/api/stock/items",
        Some(serde_json::json!({
            "name": "Flour",
            "unit": "kg",
            "unit_price": "9000",
            "current_stock": huge,
            "min_stock": "1",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was stored, so the year still summarizes
    let response = send(
        &app,
        "GET",
        "/api/reserve-allocations/summary?year=2024",
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_stored_overflow_is_400() {
    let (app, db) = setup_auth_app();
    db.upsert_revenue(2024, 1, Decimal::MAX).unwrap();
    db.upsert_revenue(2024, 2, Decimal::MAX).unwrap();
    let token = login(&app, "owner", "owner-pass").await;

    for uri in [
        "/api/revenues/2024/summary",
        "/api/dashboard?year=2024&month=2",
    ] {
        let response = send(&app, "GET", uri, None, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_out_of_range_year_rejected() {
    let app = setup_test_app();
    for uri in [
        "/api/revenues/-2147483648/summary",
        "/api/expenses/-2147483648/summary?month=1",
        "/api/dashboard?year=-2147483648&month=1",
        "/api/revenues/10000/summary",
    ] {
        let response = send(&app, "GET", uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        let json = get_body_json(response).await;
        assert!(json["fields"]["year"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = setup_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/expenses")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Reserves ==========

#[tokio::test]
async fn test_reserve_summary_over_full_year() {
    let app = setup_test_app();
    for month in 1..=12 {
        send(
            &app,
            "POST",
            "/api/revenues",
            Some(serde_json::json!({ "year": 2024, "month": month, "amount": "1000000" })),
            None,
        )
        .await;
    }
    let response = send(
        &app,
        "POST",
        "/api/settings/allocation-accounts",
        Some(serde_json::json!({ "name": "Renovation", "percentage": "30" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    send(
        &app,
        "POST",
        "/api/reserve-expenditures",
        Some(serde_json::json!({
            "name": "Paint",
            "source_type": "Renovation",
            "amount": "600000",
            "expenditure_date": "2024-05-05",
        })),
        None,
    )
    .await;

    let response = send(&app, "GET", "/api/reserve-allocations/summary?year=2024", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let balance = &json["balances"][0];
    assert_eq!(balance["account"], "Renovation");
    assert_eq!(dec(&balance["allocated"]), Decimal::from(3_600_000));
    assert_eq!(dec(&balance["remaining"]), Decimal::from(3_000_000));

    let response = send(&app, "GET", "/api/reserve-expenditures/summary/2024", None, None).await;
    let json = get_body_json(response).await;
    assert_eq!(dec(&json["total_expended"]), Decimal::from(600_000));
    assert_eq!(json["monthly_expenditure"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_duplicate_allocation_account_is_409() {
    let app = setup_test_app();
    let body = serde_json::json!({ "name": "Savings", "percentage": 10 });
    let response = send(
        &app,
        "POST",
        "/api/settings/allocation-accounts",
        Some(body.clone()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "POST", "/api/settings/allocation-accounts", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_allocation_percentage_out_of_range() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/api/settings/allocation-accounts",
        Some(serde_json::json!({ "name": "Greedy", "percentage": "101" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_recorded_allocation_lifecycle() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/api/reserve-allocations",
        Some(serde_json::json!({
            "year": 2024,
            "month": 6,
            "account_type": "Savings",
            "amount": "250000",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = get_body_json(response).await["id"].as_i64().unwrap();

    let response = send(&app, "GET", "/api/reserve-allocations?year=2024", None, None).await;
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let response = send(
        &app,
        "DELETE",
        &format!("/api/reserve-allocations/{}", id),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ========== Stock ==========

#[tokio::test]
async fn test_stock_movements() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/api/stock/items",
        Some(serde_json::json!({
            "name": "Rice",
            "unit": "kg",
            "unit_price": "12000",
            "current_stock": "5",
            "min_stock": "2",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = get_body_json(response).await["id"].as_i64().unwrap();
    let path = format!("/api/stock/items/{}/transactions", id);

    let response = send(
        &app,
        "POST",
        &path,
        Some(serde_json::json!({
            "type": "out",
            "quantity": "4",
            "price": "15000",
            "date": "2024-01-05",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Only one unit left
    let response = send(
        &app,
        "POST",
        &path,
        Some(serde_json::json!({
            "type": "out",
            "quantity": "2",
            "price": "15000",
            "date": "2024-01-06",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/stock/low", None, None).await;
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let response = send(
        &app,
        "GET",
        &format!("/api/stock/items/{}/price-history", id),
        None,
        None,
    )
    .await;
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["type"], "out");

    let response = send(&app, "GET", "/api/stock/items/999/price-history", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Reference data ==========

#[tokio::test]
async fn test_category_soft_delete() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/api/categories",
        Some(serde_json::json!({ "name": "Utilities" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = get_body_json(response).await["id"].as_i64().unwrap();

    let response = send(&app, "DELETE", &format!("/api/categories/{}", id), None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/categories", None, None).await;
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_branch_phone_validated() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/api/branches",
        Some(serde_json::json!({ "name": "Pasar Baru", "phone": "call me" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ========== Users & settings ==========

#[tokio::test]
async fn test_user_admin_flow() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/api/users",
        Some(serde_json::json!({
            "phone": "0812345678",
            "username": "kasir.1",
            "name": "Kasir Satu",
            "password": "long enough",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["role"], "user");
    let id = json["id"].as_i64().unwrap();

    let response = send(
        &app,
        "PUT",
        &format!("/api/users/{}", id),
        Some(serde_json::json!({ "role": "admin" })),
        None,
    )
    .await;
    assert_eq!(get_body_json(response).await["role"], "admin");

    let response = send(
        &app,
        "POST",
        "/api/users",
        Some(serde_json::json!({
            "phone": "12",
            "username": "x",
            "name": "",
            "password": "short",
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = get_body_json(response).await;
    assert_eq!(json["fields"].as_object().unwrap().len(), 4);
}

#[tokio::test]
async fn test_settings_round_trip() {
    let app = setup_test_app();
    let response = send(&app, "GET", "/api/settings/system", None, None).await;
    let json = get_body_json(response).await;
    assert_eq!(json["currency"], "Rp");

    let response = send(
        &app,
        "PUT",
        "/api/settings/system/shop_name",
        Some(serde_json::json!({ "value": "Toko Maju" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["shop_name"], "Toko Maju");

    let response = send(
        &app,
        "PUT",
        "/api/settings/system/decimal_separator",
        Some(serde_json::json!({ "value": "7" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_dashboard() {
    let app = setup_test_app();
    send(
        &app,
        "POST",
        "/api/revenues",
        Some(serde_json::json!({ "year": 2024, "month": 5, "amount": "1000" })),
        None,
    )
    .await;

    let response = send(&app, "GET", "/api/dashboard?year=2024&month=5", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["currency"], "Rp");
    assert_eq!(dec(&json["net_profit"]), Decimal::from(1000));
    assert_eq!(json["monthly"].as_array().unwrap().len(), 12);

    let response = send(&app, "GET", "/api/dashboard?year=2024&month=13", None, None).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app();
    let response = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}
