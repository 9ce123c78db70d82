use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use uuid::Uuid;

use super::missing;
use crate::error::AppResult;
use crate::ledger::{RecordDraft, RecordKind};
use crate::models::{Liability, LiabilityCategory, LiabilityDraft};
use crate::services::aggregator::{self, CategoryShare};
use crate::services::mutator;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LiabilitySummary {
    pub liabilities: Vec<Liability>,
    pub total_owed_cents: i64,
    pub monthly_payments_cents: i64,
    pub highest_debt: Option<Liability>,
    pub breakdown: Vec<CategoryShare<LiabilityCategory>>,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Json<LiabilitySummary>> {
    let ledger = state.load_ledger()?;

    Ok(Json(LiabilitySummary {
        total_owed_cents: aggregator::total_liabilities(&ledger.liabilities),
        monthly_payments_cents: aggregator::monthly_payments(&ledger.liabilities),
        highest_debt: aggregator::highest_debt(&ledger.liabilities).cloned(),
        breakdown: aggregator::liability_breakdown(&ledger.liabilities),
        liabilities: ledger.liabilities,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<LiabilityDraft>,
) -> AppResult<(StatusCode, Json<Liability>)> {
    let (ledger, id) =
        state.apply(|ledger| Ok(mutator::add_record(ledger, RecordDraft::Liability(draft))?))?;
    let liability = ledger
        .liability(id)
        .cloned()
        .ok_or_else(|| missing(RecordKind::Liability))?;
    Ok((StatusCode::CREATED, Json(liability)))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.apply(|ledger| Ok((mutator::remove_liability(ledger, id)?, ())))?;
    Ok(StatusCode::NO_CONTENT)
}
