use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::missing;
use crate::error::AppResult;
use crate::form_utils::{deserialize_field, parse_number};
use crate::ledger::{RecordDraft, RecordKind};
use crate::models::{Trade, TradeDraft};
use crate::services::aggregator::{self, PnlPoint, StrategyPerformance, TradingStats};
use crate::services::mutator;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TradeJournal {
    pub trades: Vec<Trade>,
    pub stats: TradingStats,
    pub cumulative_pnl: Vec<PnlPoint>,
    pub strategies: Vec<StrategyPerformance>,
}

#[derive(Debug, Deserialize)]
pub struct CloseInput {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub exit_price: String,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Json<TradeJournal>> {
    let ledger = state.load_ledger()?;

    Ok(Json(TradeJournal {
        stats: aggregator::trading_stats(&ledger.trades),
        cumulative_pnl: aggregator::cumulative_pnl(&ledger.trades),
        strategies: aggregator::strategy_performance(&ledger.trades),
        trades: ledger.trades,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<TradeDraft>,
) -> AppResult<(StatusCode, Json<Trade>)> {
    let (ledger, id) =
        state.apply(|ledger| Ok(mutator::add_record(ledger, RecordDraft::Trade(draft))?))?;
    let trade = ledger
        .trade(id)
        .cloned()
        .ok_or_else(|| missing(RecordKind::Trade))?;
    Ok((StatusCode::CREATED, Json(trade)))
}

pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CloseInput>,
) -> AppResult<Json<Trade>> {
    let exit_price = parse_number("exit_price", &input.exit_price)?;
    let (ledger, ()) =
        state.apply(|ledger| Ok((mutator::close_trade(ledger, id, exit_price)?, ())))?;
    let trade = ledger
        .trade(id)
        .cloned()
        .ok_or_else(|| missing(RecordKind::Trade))?;
    Ok(Json(trade))
}
