pub mod assets;
pub mod categories;
pub mod dashboard;
pub mod expenses;
pub mod investments;
pub mod liabilities;
pub mod net_worth;
pub mod settings;
pub mod trades;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::error::AppError;
use crate::ledger::RecordKind;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/dashboard", get(dashboard::summary))
        // Assets
        .route("/api/assets", get(assets::index).post(assets::create))
        .route("/api/assets/:id", delete(assets::delete))
        .route("/api/assets/:id/value", put(assets::refresh_value))
        // Liabilities
        .route(
            "/api/liabilities",
            get(liabilities::index).post(liabilities::create),
        )
        .route("/api/liabilities/:id", delete(liabilities::delete))
        // Expenses and budgets
        .route("/api/expenses", get(expenses::index).post(expenses::create))
        .route("/api/expenses/:id", delete(expenses::delete))
        .route("/api/budgets/:category", put(expenses::set_budget))
        // Investments
        .route(
            "/api/investments",
            get(investments::index).post(investments::create),
        )
        .route("/api/investments/preview", post(investments::preview))
        .route("/api/investments/:id/price", put(investments::refresh_price))
        // Trading journal
        .route("/api/trades", get(trades::index).post(trades::create))
        .route("/api/trades/:id/close", post(trades::close))
        // Net worth
        .route("/api/net-worth", get(net_worth::summary))
        .route("/api/net-worth/snapshots", post(net_worth::record_snapshot))
        // Display categories
        .route(
            "/api/categories",
            get(categories::index).post(categories::create),
        )
        .route("/api/categories/:id", delete(categories::delete))
        // Settings
        .route("/api/settings", get(settings::show).put(settings::update))
        .route("/api/settings/export", get(settings::export))
}

async fn health() -> &'static str {
    "OK"
}

/// The record the mutation just produced went missing from its own result.
pub(crate) fn missing(kind: RecordKind) -> AppError {
    AppError::Internal(format!("{} vanished after being written", kind))
}
