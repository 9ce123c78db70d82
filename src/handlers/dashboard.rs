use axum::extract::State;
use axum::response::Json;
use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::Serialize;

use crate::db::queries::expenses::{list_expenses_filtered, ExpenseFilter};
use crate::db::queries::settings;
use crate::error::AppResult;
use crate::models::{Expense, NetWorthSnapshot, Trade};
use crate::services::aggregator::{self, PortfolioSummary, TradingStats};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub currency: String,
    pub net_worth: NetWorthSnapshot,
    pub monthly_expenses_cents: i64,
    pub monthly_expense_budget_cents: i64,
    pub monthly_income_goal_cents: i64,
    pub portfolio: PortfolioSummary,
    pub trading: TradingStats,
    pub recent_expenses: Vec<Expense>,
    pub recent_trades: Vec<Trade>,
}

const RECENT_EXPENSES: usize = 10;
const RECENT_TRADES: usize = 5;

/// First and last day of the month containing `day`.
fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(day);
    (first, last)
}

pub async fn summary(State(state): State<AppState>) -> AppResult<Json<Dashboard>> {
    let ledger = state.load_ledger()?;
    let today = Utc::now().date_naive();
    let (from_date, to_date) = month_bounds(today);

    let (prefs, month_expenses) = {
        let conn = state.db.get()?;
        let filter = ExpenseFilter {
            from_date: Some(from_date),
            to_date: Some(to_date),
            ..Default::default()
        };
        (
            settings::get_settings(&conn)?,
            list_expenses_filtered(&conn, &filter)?,
        )
    };

    Ok(Json(Dashboard {
        currency: prefs.currency,
        net_worth: aggregator::current_net_worth(&ledger, &today.format("%Y-%m").to_string()),
        monthly_expenses_cents: aggregator::total_spent(&month_expenses),
        monthly_expense_budget_cents: prefs.monthly_expense_budget_cents,
        monthly_income_goal_cents: prefs.monthly_income_goal_cents,
        portfolio: aggregator::portfolio_summary(&ledger.investments)?,
        trading: aggregator::trading_stats(&ledger.trades),
        recent_expenses: aggregator::recent_expenses(&ledger.expenses, RECENT_EXPENSES)
            .into_iter()
            .cloned()
            .collect(),
        recent_trades: aggregator::recent_trades(&ledger.trades, RECENT_TRADES)
            .into_iter()
            .cloned()
            .collect(),
    }))
}
