use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::missing;
use crate::error::AppResult;
use crate::form_utils::{deserialize_field, parse_number};
use crate::ledger::{RecordDraft, RecordKind};
use crate::models::{Asset, AssetCategory, AssetDraft};
use crate::services::aggregator::{self, CategoryShare};
use crate::services::mutator;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AssetSummary {
    pub assets: Vec<Asset>,
    pub total_value_cents: i64,
    pub best_performing: Option<Asset>,
    pub allocation: Vec<CategoryShare<AssetCategory>>,
}

#[derive(Debug, Deserialize)]
pub struct ValueInput {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub value: String,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Json<AssetSummary>> {
    let ledger = state.load_ledger()?;
    let best_performing = aggregator::best_performing(&ledger.assets)?.cloned();

    Ok(Json(AssetSummary {
        total_value_cents: aggregator::total_value(&ledger.assets),
        allocation: aggregator::asset_allocation(&ledger.assets),
        best_performing,
        assets: ledger.assets,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<AssetDraft>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    let (ledger, id) =
        state.apply(|ledger| Ok(mutator::add_record(ledger, RecordDraft::Asset(draft))?))?;
    let asset = ledger
        .asset(id)
        .cloned()
        .ok_or_else(|| missing(RecordKind::Asset))?;
    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn refresh_value(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ValueInput>,
) -> AppResult<Json<Asset>> {
    let value = parse_number("value", &input.value)?;
    let (ledger, ()) =
        state.apply(|ledger| Ok((mutator::refresh_asset_value(ledger, id, value)?, ())))?;
    let asset = ledger
        .asset(id)
        .cloned()
        .ok_or_else(|| missing(RecordKind::Asset))?;
    Ok(Json(asset))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.apply(|ledger| Ok((mutator::remove_asset(ledger, id)?, ())))?;
    Ok(StatusCode::NO_CONTENT)
}
