use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::form_utils::deserialize_field;
use crate::models::{NetWorthDelta, NetWorthHistory, NetWorthSnapshot};
use crate::services::aggregator::{current_net_worth, net_worth_delta, net_worth_history};
use crate::services::mutator;
use crate::services::net_worth::decimate_for_display;
use crate::state::AppState;

const CURRENT_PERIOD: &str = "current";

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub max_points: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NetWorthSummary {
    /// Totals of the live ledger.
    pub current: NetWorthSnapshot,
    /// Change of the live totals against the latest recorded snapshot.
    pub change_since_last_snapshot: Option<NetWorthDelta>,
    pub history: NetWorthHistory,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotInput {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub period: String,
}

pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<NetWorthSummary>> {
    let ledger = state.load_ledger()?;
    let current = current_net_worth(&ledger, CURRENT_PERIOD);
    let change_since_last_snapshot = ledger
        .snapshots
        .last()
        .map(|last| net_worth_delta(&current, last));

    let mut history = net_worth_history(&ledger.snapshots);
    if let Some(max_points) = query.max_points {
        history.points = decimate_for_display(&history.points, max_points);
    }

    Ok(Json(NetWorthSummary {
        current,
        change_since_last_snapshot,
        history,
    }))
}

pub async fn record_snapshot(
    State(state): State<AppState>,
    Json(input): Json<SnapshotInput>,
) -> AppResult<(StatusCode, Json<NetWorthSnapshot>)> {
    let period = input.period.trim().to_string();
    let (ledger, ()) =
        state.apply(|ledger| Ok((mutator::record_snapshot(ledger, &period)?, ())))?;
    let snapshot = ledger
        .snapshot(&period)
        .cloned()
        .ok_or_else(|| AppError::Internal(format!("snapshot {} was not recorded", period)))?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}
