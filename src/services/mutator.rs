//! Record mutations over a [`Ledger`].
//!
//! Each function borrows the current ledger and returns a new one. On error
//! nothing has been touched, so callers can keep the previous value as-is.
use chrono::Utc;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::form_utils::{require_non_negative, require_positive, to_cents};
use crate::ledger::{Ledger, RecordDraft, RecordKind};
use crate::models::investment::roi_percent;
use crate::models::{Budget, CategoryDraft, ExpenseCategory, ExpenseDraft, InvestmentDraft, TradeStatus};
use crate::services::net_worth::current_net_worth;

/// Validates `draft`, assigns an id and timestamp and appends it. Expenses
/// always go through [`add_expense_with_budget_sync`].
pub fn add_record(ledger: &Ledger, draft: RecordDraft) -> LedgerResult<(Ledger, Uuid)> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let mut next = ledger.clone();

    match &draft {
        RecordDraft::Asset(d) => next.assets.push(d.to_asset(id, now)?),
        RecordDraft::Liability(d) => next.liabilities.push(d.to_liability(id, now)?),
        RecordDraft::Expense(d) => return add_expense_with_budget_sync(ledger, d),
        RecordDraft::Investment(d) => next.investments.push(d.to_investment(id, now)?),
        RecordDraft::Trade(d) => next.trades.push(d.to_trade(id, now.date_naive())?),
    }

    tracing::debug!(kind = %draft.kind(), %id, "Added record");
    Ok((next, id))
}

/// Appends the expense and adds its amount to the budget for the same
/// category. Without a budget the expense is still recorded and no budget
/// is created.
pub fn add_expense_with_budget_sync(
    ledger: &Ledger,
    draft: &ExpenseDraft,
) -> LedgerResult<(Ledger, Uuid)> {
    let id = Uuid::new_v4();
    let expense = draft.to_expense(id, Utc::now().date_naive())?;
    let mut next = ledger.clone();

    if let Some(budget) = next
        .budgets
        .iter_mut()
        .find(|b| b.category == expense.category)
    {
        budget.spent_cents = budget.spent_cents.saturating_add(expense.amount_cents);
        tracing::debug!(
            category = %budget.category,
            spent_cents = budget.spent_cents,
            "Synced budget"
        );
    }

    tracing::debug!(%id, amount_cents = expense.amount_cents, "Added expense");
    next.expenses.push(expense);
    Ok((next, id))
}

/// Closes an open trade at `exit_price`, dated today.
pub fn close_trade(ledger: &Ledger, trade_id: Uuid, exit_price: f64) -> LedgerResult<Ledger> {
    let trade = ledger
        .trade(trade_id)
        .ok_or_else(|| LedgerError::not_found(RecordKind::Trade, trade_id))?;

    if trade.status == TradeStatus::Closed {
        return Err(LedgerError::InvalidState {
            from: trade.status,
            to: TradeStatus::Closed,
        });
    }

    let exit_price_cents = to_cents(require_positive("exit_price", exit_price)?);
    if exit_price_cents == 0 {
        return Err(LedgerError::validation("exit_price", "rounds to zero cents"));
    }

    let mut next = ledger.clone();
    let trade = next
        .trades
        .iter_mut()
        .find(|t| t.id == trade_id)
        .ok_or_else(|| LedgerError::not_found(RecordKind::Trade, trade_id))?;

    let pnl_cents = trade.pnl_at(exit_price_cents);
    trade.exit_price_cents = Some(exit_price_cents);
    trade.exit_date = Some(Utc::now().date_naive());
    trade.pnl_cents = Some(pnl_cents);
    trade.status = TradeStatus::Closed;

    tracing::debug!(%trade_id, symbol = %trade.symbol, pnl_cents, "Closed trade");
    Ok(next)
}

/// ROI in percent for a submitted investment. Stored investments derive it
/// on read via [`crate::models::Investment::roi_percent`].
pub fn derive_investment_roi(draft: &InvestmentDraft) -> LedgerResult<f64> {
    let (buy_cents, current_cents) = draft.prices()?;
    roi_percent(buy_cents, current_cents)
        .ok_or_else(|| LedgerError::validation("buy_price", "must be greater than zero"))
}

/// Creates the category's budget with nothing spent, or changes the limit of
/// an existing one and keeps its spent total.
pub fn set_budget(ledger: &Ledger, category: ExpenseCategory, limit: f64) -> LedgerResult<Ledger> {
    let limit_cents = to_cents(require_non_negative("limit", limit)?);
    let mut next = ledger.clone();

    match next.budgets.iter_mut().find(|b| b.category == category) {
        Some(budget) => budget.limit_cents = limit_cents,
        None => next.budgets.push(Budget::new(category, limit_cents)),
    }

    tracing::debug!(%category, limit_cents, "Set budget");
    Ok(next)
}

pub fn refresh_asset_value(ledger: &Ledger, id: Uuid, value: f64) -> LedgerResult<Ledger> {
    let value_cents = to_cents(require_non_negative("value", value)?);
    let mut next = ledger.clone();
    let asset = next
        .assets
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| LedgerError::not_found(RecordKind::Asset, id))?;

    asset.value_cents = value_cents;
    asset.last_updated = Utc::now();
    Ok(next)
}

pub fn refresh_investment_price(ledger: &Ledger, id: Uuid, price: f64) -> LedgerResult<Ledger> {
    let price_cents = to_cents(require_non_negative("current_price", price)?);
    let mut next = ledger.clone();
    let investment = next
        .investments
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| LedgerError::not_found(RecordKind::Investment, id))?;

    investment.current_price_cents = price_cents;
    investment.last_updated = Utc::now();
    Ok(next)
}

fn remove_by_id<T>(
    items: &[T],
    id: Uuid,
    kind: RecordKind,
    id_of: impl Fn(&T) -> Uuid,
) -> LedgerResult<Vec<T>>
where
    T: Clone,
{
    if !items.iter().any(|item| id_of(item) == id) {
        return Err(LedgerError::not_found(kind, id));
    }
    tracing::debug!(%kind, %id, "Removed record");
    Ok(items.iter().filter(|item| id_of(item) != id).cloned().collect())
}

pub fn remove_asset(ledger: &Ledger, id: Uuid) -> LedgerResult<Ledger> {
    let assets = remove_by_id(&ledger.assets, id, RecordKind::Asset, |a| a.id)?;
    Ok(Ledger {
        assets,
        ..ledger.clone()
    })
}

pub fn remove_liability(ledger: &Ledger, id: Uuid) -> LedgerResult<Ledger> {
    let liabilities = remove_by_id(&ledger.liabilities, id, RecordKind::Liability, |l| l.id)?;
    Ok(Ledger {
        liabilities,
        ..ledger.clone()
    })
}

/// Budgets keep their spent totals.
pub fn remove_expense(ledger: &Ledger, id: Uuid) -> LedgerResult<Ledger> {
    let expenses = remove_by_id(&ledger.expenses, id, RecordKind::Expense, |e| e.id)?;
    Ok(Ledger {
        expenses,
        ..ledger.clone()
    })
}

pub fn remove_category(ledger: &Ledger, id: Uuid) -> LedgerResult<Ledger> {
    let categories = remove_by_id(&ledger.categories, id, RecordKind::Category, |c| c.id)?;
    Ok(Ledger {
        categories,
        ..ledger.clone()
    })
}

pub fn add_category(ledger: &Ledger, draft: &CategoryDraft) -> LedgerResult<(Ledger, Uuid)> {
    let id = Uuid::new_v4();
    let category = draft.to_category(id)?;
    let mut next = ledger.clone();
    next.categories.push(category);
    Ok((next, id))
}

/// Appends a snapshot of the current totals under `period`. Each period
/// label may be recorded once.
pub fn record_snapshot(ledger: &Ledger, period: &str) -> LedgerResult<Ledger> {
    let period = period.trim();
    if period.is_empty() {
        return Err(LedgerError::validation("period", "is required"));
    }
    if ledger.snapshot(period).is_some() {
        return Err(LedgerError::validation(
            "period",
            format!("a snapshot for '{}' already exists", period),
        ));
    }

    let snapshot = current_net_worth(ledger, period);
    tracing::debug!(period, net_worth_cents = snapshot.net_worth_cents, "Recorded snapshot");

    let mut next = ledger.clone();
    next.snapshots.push(snapshot);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetDraft, TradeDraft, TradeSide};

    fn trade_draft(side: &str, entry: &str, quantity: &str) -> TradeDraft {
        TradeDraft {
            symbol: "aapl".into(),
            side: side.into(),
            strategy: "Breakout".into(),
            entry_price: entry.into(),
            quantity: quantity.into(),
            entry_date: Some("2024-01-15".into()),
            notes: None,
        }
    }

    fn expense_draft(category: &str, amount: &str) -> ExpenseDraft {
        ExpenseDraft {
            name: "Groceries".into(),
            category: category.into(),
            amount: amount.into(),
            date: Some("2024-03-02".into()),
            notes: None,
        }
    }

    fn open_trade(ledger: &Ledger, side: &str, entry: &str, quantity: &str) -> (Ledger, Uuid) {
        add_record(ledger, RecordDraft::Trade(trade_draft(side, entry, quantity))).unwrap()
    }

    #[test]
    fn test_add_asset_round_trip() {
        let draft = AssetDraft {
            name: "Brokerage".into(),
            category: "stocks".into(),
            value: "48000.50".into(),
            growth_rate: Some("7.5".into()),
            notes: Some("  index funds ".into()),
        };
        let (ledger, id) = add_record(&Ledger::new(), RecordDraft::Asset(draft)).unwrap();

        let asset = ledger.asset(id).unwrap();
        assert_eq!(asset.id, id);
        assert_eq!(asset.name, "Brokerage");
        assert_eq!(asset.value_cents, 48_000_50);
        assert_eq!(asset.growth_rate, Some(7.5));
        assert_eq!(asset.notes.as_deref(), Some("index funds"));
        assert!(asset.last_updated <= Utc::now());
    }

    #[test]
    fn test_add_record_reports_first_invalid_field() {
        let draft = AssetDraft {
            name: "".into(),
            category: "yachts".into(),
            value: "abc".into(),
            ..Default::default()
        };
        let ledger = Ledger::new();
        let err = add_record(&ledger, RecordDraft::Asset(draft)).unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "name", .. }));
        assert!(ledger.assets.is_empty());
    }

    #[test]
    fn test_trade_symbol_is_uppercased_and_open() {
        let (ledger, id) = open_trade(&Ledger::new(), "buy", "185.50", "10");
        let trade = ledger.trade(id).unwrap();
        assert_eq!(trade.symbol, "AAPL");
        assert_eq!(trade.status, TradeStatus::Open);
        assert!(trade.pnl_cents.is_none());
    }

    #[test]
    fn test_close_buy_trade() {
        let (ledger, id) = open_trade(&Ledger::new(), "buy", "185.50", "10");
        let closed = close_trade(&ledger, id, 192.30).unwrap();
        let trade = closed.trade(id).unwrap();
        assert_eq!(trade.pnl_cents, Some(68_00));
        assert_eq!(trade.exit_price_cents, Some(192_30));
        assert_eq!(trade.status, TradeStatus::Closed);
        assert_eq!(trade.exit_date, Some(Utc::now().date_naive()));
    }

    #[test]
    fn test_close_sell_trade_profits_when_price_falls() {
        let (ledger, id) = open_trade(&Ledger::new(), "sell", "420.10", "8");
        assert_eq!(ledger.trade(id).unwrap().side, TradeSide::Sell);
        let closed = close_trade(&ledger, id, 415.80).unwrap();
        assert_eq!(closed.trade(id).unwrap().pnl_cents, Some(34_40));
    }

    #[test]
    fn test_close_trade_twice_is_invalid_state() {
        let (ledger, id) = open_trade(&Ledger::new(), "buy", "100", "1");
        let closed = close_trade(&ledger, id, 110.0).unwrap();
        let err = close_trade(&closed, id, 120.0).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidState {
                from: TradeStatus::Closed,
                to: TradeStatus::Closed,
            }
        );
        assert_eq!(closed.trade(id).unwrap().exit_price_cents, Some(110_00));
    }

    #[test]
    fn test_close_trade_errors_leave_ledger_untouched() {
        let (ledger, id) = open_trade(&Ledger::new(), "buy", "100", "1");
        let before = ledger.clone();

        assert!(matches!(
            close_trade(&ledger, Uuid::new_v4(), 110.0),
            Err(LedgerError::NotFound { kind: RecordKind::Trade, .. })
        ));
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                close_trade(&ledger, id, bad),
                Err(LedgerError::Validation { field: "exit_price", .. })
            ));
        }
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_expense_updates_matching_budget() {
        let ledger = set_budget(&Ledger::new(), ExpenseCategory::Food, 400.0).unwrap();
        let (ledger, _) =
            add_record(&ledger, RecordDraft::Expense(expense_draft("food", "125.40"))).unwrap();
        let (ledger, _) =
            add_expense_with_budget_sync(&ledger, &expense_draft("food", "24.60")).unwrap();

        let budget = ledger.budget(ExpenseCategory::Food).unwrap();
        assert_eq!(budget.spent_cents, 150_00);
        assert_eq!(ledger.expenses.len(), 2);
    }

    #[test]
    fn test_expense_without_budget_creates_none() {
        let (ledger, id) =
            add_expense_with_budget_sync(&Ledger::new(), &expense_draft("transport", "30")).unwrap();
        assert!(ledger.budgets.is_empty());
        assert_eq!(ledger.expense(id).unwrap().amount_cents, 30_00);
    }

    #[test]
    fn test_invalid_expense_leaves_budget_alone() {
        let ledger = set_budget(&Ledger::new(), ExpenseCategory::Food, 400.0).unwrap();
        let err = add_expense_with_budget_sync(&ledger, &expense_draft("food", "-3")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "amount", .. }));
        assert_eq!(ledger.budget(ExpenseCategory::Food).unwrap().spent_cents, 0);
    }

    #[test]
    fn test_set_budget_keeps_spent() {
        let ledger = set_budget(&Ledger::new(), ExpenseCategory::Food, 400.0).unwrap();
        let (ledger, _) = add_expense_with_budget_sync(&ledger, &expense_draft("food", "50")).unwrap();
        let ledger = set_budget(&ledger, ExpenseCategory::Food, 600.0).unwrap();
        let budget = ledger.budget(ExpenseCategory::Food).unwrap();
        assert_eq!(budget.limit_cents, 600_00);
        assert_eq!(budget.spent_cents, 50_00);
    }

    #[test]
    fn test_remove_expense_does_not_cascade() {
        let ledger = set_budget(&Ledger::new(), ExpenseCategory::Food, 400.0).unwrap();
        let (ledger, id) = add_expense_with_budget_sync(&ledger, &expense_draft("food", "50")).unwrap();
        let ledger = remove_expense(&ledger, id).unwrap();
        assert!(ledger.expenses.is_empty());
        assert_eq!(ledger.budget(ExpenseCategory::Food).unwrap().spent_cents, 50_00);
        assert!(matches!(
            remove_expense(&ledger, id),
            Err(LedgerError::NotFound { kind: RecordKind::Expense, .. })
        ));
    }

    #[test]
    fn test_derive_investment_roi() {
        let draft = InvestmentDraft {
            name: "ETH".into(),
            category: "crypto".into(),
            buy_price: "2000".into(),
            current_price: "2500".into(),
            quantity: "1".into(),
            notes: None,
        };
        assert_eq!(derive_investment_roi(&draft).unwrap(), 25.0);

        let zero = InvestmentDraft {
            buy_price: "0".into(),
            ..draft
        };
        assert!(matches!(
            derive_investment_roi(&zero),
            Err(LedgerError::Validation { field: "buy_price", .. })
        ));
    }

    #[test]
    fn test_refresh_investment_price_changes_roi() {
        let draft = InvestmentDraft {
            name: "VTI".into(),
            category: "stocks".into(),
            buy_price: "200".into(),
            current_price: "200".into(),
            quantity: "3".into(),
            notes: None,
        };
        let (ledger, id) = add_record(&Ledger::new(), RecordDraft::Investment(draft)).unwrap();
        assert_eq!(ledger.investment(id).unwrap().roi_percent(), Some(0.0));

        let ledger = refresh_investment_price(&ledger, id, 250.0).unwrap();
        assert_eq!(ledger.investment(id).unwrap().roi_percent(), Some(25.0));
    }

    #[test]
    fn test_record_snapshot_rejects_duplicate_period() {
        let draft = AssetDraft {
            name: "Savings".into(),
            category: "cash".into(),
            value: "1000".into(),
            ..Default::default()
        };
        let (ledger, _) = add_record(&Ledger::new(), RecordDraft::Asset(draft)).unwrap();
        let ledger = record_snapshot(&ledger, "2024-06").unwrap();
        assert_eq!(ledger.snapshots[0].net_worth_cents, 1_000_00);

        assert!(matches!(
            record_snapshot(&ledger, "2024-06"),
            Err(LedgerError::Validation { field: "period", .. })
        ));
    }

    #[test]
    fn test_category_add_and_remove() {
        let draft = CategoryDraft {
            name: "Groceries".into(),
            kind: "expense".into(),
            color: Some("#FF0000".into()),
        };
        let (ledger, id) = add_category(&Ledger::new(), &draft).unwrap();
        assert_eq!(ledger.category(id).unwrap().color, "#ff0000");
        let ledger = remove_category(&ledger, id).unwrap();
        assert!(ledger.categories.is_empty());
    }
}
