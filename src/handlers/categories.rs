use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::missing;
use crate::error::AppResult;
use crate::form_utils::parse_choice;
use crate::ledger::RecordKind;
use crate::models::{Category, CategoryDraft, CategoryKind};
use crate::services::mutator;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub kind: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<Category>>> {
    let kind = query
        .kind
        .as_deref()
        .map(|k| parse_choice::<CategoryKind>("kind", k))
        .transpose()?;
    let ledger = state.load_ledger()?;

    let categories = ledger
        .categories
        .into_iter()
        .filter(|c| kind.map_or(true, |k| c.kind == k))
        .collect();
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<CategoryDraft>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let (ledger, id) = state.apply(|ledger| Ok(mutator::add_category(ledger, &draft)?))?;
    let category = ledger
        .category(id)
        .cloned()
        .ok_or_else(|| missing(RecordKind::Category))?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.apply(|ledger| Ok((mutator::remove_category(ledger, id)?, ())))?;
    Ok(StatusCode::NO_CONTENT)
}
