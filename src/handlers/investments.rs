use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::missing;
use crate::error::AppResult;
use crate::form_utils::{deserialize_field, parse_number};
use crate::ledger::{RecordDraft, RecordKind};
use crate::models::{Investment, InvestmentDraft};
use crate::services::aggregator::{self, PortfolioSummary};
use crate::services::mutator;
use crate::state::AppState;

/// An investment together with the figures derived from its current price.
#[derive(Debug, Serialize)]
pub struct InvestmentView {
    #[serde(flatten)]
    pub investment: Investment,
    pub roi_percent: Option<f64>,
    pub market_value_cents: i64,
    pub gain_loss_cents: i64,
}

impl From<&Investment> for InvestmentView {
    fn from(investment: &Investment) -> Self {
        Self {
            roi_percent: investment.roi_percent(),
            market_value_cents: investment.market_value_cents(),
            gain_loss_cents: investment.gain_loss_cents(),
            investment: investment.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvestmentSummary {
    pub investments: Vec<InvestmentView>,
    pub portfolio: PortfolioSummary,
    pub best_investment: Option<InvestmentView>,
}

#[derive(Debug, Serialize)]
pub struct RoiPreview {
    pub roi_percent: f64,
}

#[derive(Debug, Deserialize)]
pub struct PriceInput {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub current_price: String,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Json<InvestmentSummary>> {
    let ledger = state.load_ledger()?;

    Ok(Json(InvestmentSummary {
        portfolio: aggregator::portfolio_summary(&ledger.investments)?,
        best_investment: aggregator::best_investment(&ledger.investments).map(InvestmentView::from),
        investments: ledger.investments.iter().map(InvestmentView::from).collect(),
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<InvestmentDraft>,
) -> AppResult<(StatusCode, Json<InvestmentView>)> {
    let (ledger, id) =
        state.apply(|ledger| Ok(mutator::add_record(ledger, RecordDraft::Investment(draft))?))?;
    let investment = ledger
        .investment(id)
        .ok_or_else(|| missing(RecordKind::Investment))?;
    Ok((StatusCode::CREATED, Json(InvestmentView::from(investment))))
}

/// ROI of a submission before it is saved.
pub async fn preview(Json(draft): Json<InvestmentDraft>) -> AppResult<Json<RoiPreview>> {
    let roi_percent = mutator::derive_investment_roi(&draft)?;
    Ok(Json(RoiPreview { roi_percent }))
}

pub async fn refresh_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<PriceInput>,
) -> AppResult<Json<InvestmentView>> {
    let price = parse_number("current_price", &input.current_price)?;
    let (ledger, ()) =
        state.apply(|ledger| Ok((mutator::refresh_investment_price(ledger, id, price)?, ())))?;
    let investment = ledger
        .investment(id)
        .ok_or_else(|| missing(RecordKind::Investment))?;
    Ok(Json(InvestmentView::from(investment)))
}
