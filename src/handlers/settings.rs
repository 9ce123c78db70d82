use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::queries::{categories, settings};
use crate::error::{AppError, AppResult};
use crate::models::{Category, Settings, SettingsUpdate};
use crate::state::AppState;
use crate::VERSION;

/// Downloadable backup of the user's preferences and display categories.
#[derive(Debug, Serialize)]
pub struct SettingsExport {
    pub version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub settings: Settings,
    pub categories: Vec<Category>,
}

pub async fn show(State(state): State<AppState>) -> AppResult<Json<Settings>> {
    Ok(Json(state.load_settings()?))
}

pub async fn update(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> AppResult<Json<Settings>> {
    let conn = state.db.get()?;
    let next = settings::get_settings(&conn)?.apply(&update)?;
    settings::save_settings(&conn, &next)?;
    Ok(Json(next))
}

pub async fn export(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let backup = {
        let conn = state.db.get()?;
        SettingsExport {
            version: VERSION,
            exported_at: Utc::now(),
            settings: settings::get_settings(&conn)?,
            categories: categories::list_categories(&conn)?,
        }
    };

    tracing::info!(categories = backup.categories.len(), "Exporting settings");

    let json = serde_json::to_string_pretty(&backup)
        .map_err(|e| AppError::Internal(format!("Failed to serialize: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"finboard-backup.json\"",
            ),
        ],
        json,
    ))
}
