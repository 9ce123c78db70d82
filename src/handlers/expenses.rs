use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::missing;
use crate::db::queries::expenses::{list_expenses_filtered, ExpenseFilter};
use crate::error::AppResult;
use crate::form_utils::{deserialize_field, parse_choice, parse_number, parse_optional_date};
use crate::ledger::{RecordDraft, RecordKind};
use crate::models::{Expense, ExpenseCategory, ExpenseDraft};
use crate::services::aggregator::{self, BudgetStatus, CategoryShare};
use crate::services::mutator;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    pub category: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl ExpenseQuery {
    fn to_filter(&self) -> AppResult<ExpenseFilter> {
        let category = match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => Some(parse_choice::<ExpenseCategory>("category", c)?),
            _ => None,
        };
        Ok(ExpenseFilter {
            category,
            from_date: parse_optional_date("from_date", self.from_date.as_ref())?,
            to_date: parse_optional_date("to_date", self.to_date.as_ref())?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseSummary {
    pub expenses: Vec<Expense>,
    pub total_spent_cents: i64,
    pub biggest_expense: Option<Expense>,
    pub by_category: BTreeMap<ExpenseCategory, i64>,
    pub breakdown: Vec<CategoryShare<ExpenseCategory>>,
    pub budgets: Vec<BudgetStatus>,
    pub total_budget_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct BudgetInput {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub limit: String,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ExpenseQuery>,
) -> AppResult<Json<ExpenseSummary>> {
    let filter = query.to_filter()?;
    let ledger = state.load_ledger()?;
    let expenses = {
        let conn = state.db.get()?;
        list_expenses_filtered(&conn, &filter)?
    };

    Ok(Json(ExpenseSummary {
        total_spent_cents: aggregator::total_spent(&expenses),
        biggest_expense: aggregator::biggest_expense(&expenses).cloned(),
        by_category: aggregator::spending_by_category(&expenses),
        breakdown: aggregator::spending_breakdown(&expenses),
        budgets: ledger.budgets.iter().map(aggregator::budget_status).collect(),
        total_budget_cents: aggregator::total_budget(&ledger.budgets),
        expenses,
    }))
}

/// Records the expense and bumps the matching budget in a single
/// transaction.
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ExpenseDraft>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let (ledger, id) =
        state.apply(|ledger| Ok(mutator::add_record(ledger, RecordDraft::Expense(draft))?))?;
    let expense = ledger
        .expense(id)
        .cloned()
        .ok_or_else(|| missing(RecordKind::Expense))?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.apply(|ledger| Ok((mutator::remove_expense(ledger, id)?, ())))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_budget(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(input): Json<BudgetInput>,
) -> AppResult<Json<BudgetStatus>> {
    let category = parse_choice::<ExpenseCategory>("category", &category)?;
    let limit = parse_number("limit", &input.limit)?;
    let (ledger, ()) =
        state.apply(|ledger| Ok((mutator::set_budget(ledger, category, limit)?, ())))?;
    let budget = ledger
        .budget(category)
        .ok_or_else(|| missing(RecordKind::Budget))?;
    Ok(Json(aggregator::budget_status(budget)))
}
