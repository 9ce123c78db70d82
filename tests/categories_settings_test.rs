//! Integration tests for display categories and user settings.

mod common;

use axum::http::StatusCode;
use common::TestClient;
use serde_json::json;

#[tokio::test]
async fn test_category_lifecycle() {
    let client = TestClient::new();
    let (status, created) = client
        .post_json(
            "/api/categories",
            json!({ "name": "Groceries", "kind": "expense", "color": "#FFAA00" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["color"], "#ffaa00");

    let (status, _) = client
        .post_json("/api/categories", json!({ "name": "Home", "kind": "asset" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, all) = client.get_json("/api/categories").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, assets) = client.get_json("/api/categories?kind=asset").await;
    let assets = assets.as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["name"], "Home");

    let id = created["id"].as_str().unwrap();
    assert_eq!(
        client.delete(&format!("/api/categories/{id}")).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        client.delete(&format!("/api/categories/{id}")).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_category_validation() {
    let client = TestClient::new();
    let (status, body) = client
        .post_json(
            "/api/categories",
            json!({ "name": "Fun", "kind": "expense", "color": "red" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "color");

    let (status, body) = client
        .post_json("/api/categories", json!({ "name": "Fun", "kind": "income" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "kind");

    let (status, body) = client.get_json("/api/categories?kind=income").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "kind");
}

#[tokio::test]
async fn test_default_settings() {
    let client = TestClient::new();
    let (status, body) = client.get_json("/api/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["locale"], "en-US");
    assert_eq!(body["timezone"], "UTC");
    assert_eq!(body["monthly_expense_budget_cents"], 0);
}

#[tokio::test]
async fn test_update_settings() {
    let client = TestClient::new();
    let (status, body) = client
        .put_json(
            "/api/settings",
            json!({ "currency": "eur", "monthly_expense_budget": "2500" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["locale"], "en-US");
    assert_eq!(body["monthly_expense_budget_cents"], 250_000);

    let (_, dashboard) = client.get_json("/api/dashboard").await;
    assert_eq!(dashboard["currency"], "EUR");
}

#[tokio::test]
async fn test_negative_goal_rejected() {
    let client = TestClient::new();
    let (status, body) = client
        .put_json("/api/settings", json!({ "monthly_income_goal": "-1" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "monthly_income_goal");

    let (_, settings) = client.get_json("/api/settings").await;
    assert_eq!(settings["monthly_income_goal_cents"], 0);
}

#[tokio::test]
async fn test_notification_preferences() {
    let client = TestClient::new();
    let (_, body) = client.get_json("/api/settings").await;
    assert_eq!(body["notifications"]["budget_alerts"], true);
    assert_eq!(body["notifications"]["trading_reminders"], false);

    let (status, body) = client
        .put_json(
            "/api/settings",
            json!({ "trading_reminders": true, "monthly_reports": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notifications"]["trading_reminders"], true);
    assert_eq!(body["notifications"]["monthly_reports"], false);
    assert_eq!(body["notifications"]["email_notifications"], true);

    let (_, body) = client.get_json("/api/settings").await;
    assert_eq!(body["notifications"]["trading_reminders"], true);
}

#[tokio::test]
async fn test_settings_export() {
    let client = TestClient::new();
    client
        .put_json("/api/settings", json!({ "currency": "chf" }))
        .await;
    client
        .post_json("/api/categories", json!({ "name": "Rent", "kind": "expense" }))
        .await;

    let (status, text) = client.get("/api/settings/export").await;
    assert_eq!(status, StatusCode::OK);

    let backup: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(backup["settings"]["currency"], "CHF");
    assert_eq!(backup["categories"][0]["name"], "Rent");
    assert!(backup["exported_at"].as_str().is_some());
    assert_eq!(backup["version"], env!("CARGO_PKG_VERSION"));
}
