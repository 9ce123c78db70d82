//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the JSON API against a fresh in-memory database.
//! Not every helper is used by every test file.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use finboard::config::Config;
use finboard::db::{create_in_memory_pool, migrations};
use finboard::server;
use finboard::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tower::ServiceExt;

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// Create a new test client with a fresh in-memory database.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 7070,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
        };

        Self {
            state: AppState::new(pool, config),
        }
    }

    /// Wrap an already-built state, e.g. one backed by a database file.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    async fn send_json(&self, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        let (status, text) = self
            .send(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;
        (status, serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    /// Make a GET request and return status and raw body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// GET and parse the body as JSON (`Null` when it is not JSON).
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json("POST", uri, &body).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json("PUT", uri, &body).await
    }

    pub async fn delete(&self, uri: &str) -> StatusCode {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .0
    }

    // =========================================================================
    // Helper methods for creating records through the API
    // =========================================================================

    /// Create an asset and return its id.
    pub async fn create_asset(&self, name: &str, category: &str, value: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/assets",
                json!({ "name": name, "category": category, "value": value }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create asset failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_liability(&self, name: &str, category: &str, amount: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/liabilities",
                json!({ "name": name, "category": category, "amount": amount }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create liability failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_expense(&self, name: &str, category: &str, amount: &str, date: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/expenses",
                json!({ "name": name, "category": category, "amount": amount, "date": date }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create expense failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn set_budget(&self, category: &str, limit: &str) -> Value {
        let (status, body) = self
            .put_json(&format!("/api/budgets/{category}"), json!({ "limit": limit }))
            .await;
        assert_eq!(status, StatusCode::OK, "set budget failed: {body}");
        body
    }

    pub async fn create_investment(
        &self,
        name: &str,
        buy_price: &str,
        current_price: &str,
        quantity: &str,
    ) -> String {
        let (status, body) = self
            .post_json(
                "/api/investments",
                json!({
                    "name": name,
                    "category": "stocks",
                    "buy_price": buy_price,
                    "current_price": current_price,
                    "quantity": quantity,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create investment failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn open_trade(&self, symbol: &str, side: &str, entry_price: &str, quantity: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/trades",
                json!({
                    "symbol": symbol,
                    "side": side,
                    "strategy": "Breakout",
                    "entry_price": entry_price,
                    "quantity": quantity,
                    "entry_date": "2024-01-15",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "open trade failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
