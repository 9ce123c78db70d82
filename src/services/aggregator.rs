//! Read-only reductions over ledger collections.
//!
//! Every function here is pure. Ratios with a zero denominator return a
//! documented sentinel (`None` or `0.0`) instead of failing; errors are
//! reserved for malformed numbers such as a non-finite growth rate.
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{LedgerError, LedgerResult};
use crate::form_utils::sum_cents;
use crate::models::{
    Asset, AssetCategory, Budget, Expense, ExpenseCategory, Investment, Liability,
    LiabilityCategory, Trade,
};

pub use crate::services::net_worth::{current_net_worth, net_worth_delta, net_worth_history};

/// One slice of a per-category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare<C> {
    pub category: C,
    pub label: &'static str,
    pub total_cents: i64,
    pub count: usize,
    pub percentage: f64,
}

fn shares<C, I>(entries: I, label: fn(&C) -> &'static str) -> Vec<CategoryShare<C>>
where
    C: Ord + Copy,
    I: IntoIterator<Item = (C, i64)>,
{
    let mut totals: BTreeMap<C, (i64, usize)> = BTreeMap::new();
    for (category, cents) in entries {
        let entry = totals.entry(category).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(cents);
        entry.1 += 1;
    }

    let grand_total = sum_cents(totals.values().map(|(total, _)| *total));

    let mut result: Vec<CategoryShare<C>> = totals
        .into_iter()
        .map(|(category, (total_cents, count))| CategoryShare {
            category,
            label: label(&category),
            total_cents,
            count,
            percentage: if grand_total > 0 {
                total_cents as f64 / grand_total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();

    result.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));
    result
}

/// First element with the strictly greatest key; ties keep the earlier one.
fn first_max_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Option<T>
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    let mut best: Option<(T, K)> = None;
    for item in items {
        let k = key(&item);
        let replace = match &best {
            Some((_, best_k)) => k > *best_k,
            None => true,
        };
        if replace {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

// Assets

/// Sum of asset values; 0 for an empty list.
pub fn total_value(assets: &[Asset]) -> i64 {
    sum_cents(assets.iter().map(|a| a.value_cents))
}

/// Asset with the highest growth rate. Assets without one are skipped and
/// `None` is returned when nothing qualifies.
pub fn best_performing(assets: &[Asset]) -> LedgerResult<Option<&Asset>> {
    let mut rated = Vec::with_capacity(assets.len());
    for asset in assets {
        if let Some(rate) = asset.growth_rate {
            if !rate.is_finite() {
                return Err(LedgerError::validation(
                    "growth_rate",
                    format!("{} has a non-finite growth rate", asset.name),
                ));
            }
            rated.push((asset, rate));
        }
    }
    Ok(first_max_by(rated, |(_, rate)| *rate).map(|(asset, _)| asset))
}

pub fn asset_allocation(assets: &[Asset]) -> Vec<CategoryShare<AssetCategory>> {
    shares(
        assets.iter().map(|a| (a.category, a.value_cents)),
        AssetCategory::label,
    )
}

// Liabilities

pub fn total_liabilities(liabilities: &[Liability]) -> i64 {
    sum_cents(liabilities.iter().map(|l| l.amount_cents))
}

pub fn monthly_payments(liabilities: &[Liability]) -> i64 {
    sum_cents(liabilities.iter().filter_map(|l| l.monthly_payment_cents))
}

pub fn highest_debt(liabilities: &[Liability]) -> Option<&Liability> {
    first_max_by(liabilities, |l| l.amount_cents)
}

pub fn liability_breakdown(liabilities: &[Liability]) -> Vec<CategoryShare<LiabilityCategory>> {
    shares(
        liabilities.iter().map(|l| (l.category, l.amount_cents)),
        LiabilityCategory::label,
    )
}

// Investments

fn check_quantity(quantity: f64, name: &str) -> LedgerResult<()> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(LedgerError::validation(
            "quantity",
            format!("{} has an invalid quantity {}", name, quantity),
        ));
    }
    Ok(())
}

/// Portfolio-wide return in percent:
/// `(Σ current × qty − Σ buy × qty) / Σ buy × qty × 100`.
/// `None` when the total cost basis is zero.
pub fn portfolio_roi(investments: &[Investment]) -> LedgerResult<Option<f64>> {
    let mut cost = 0.0;
    let mut value = 0.0;
    for investment in investments {
        check_quantity(investment.quantity, &investment.name)?;
        cost += investment.buy_price_cents as f64 * investment.quantity;
        value += investment.current_price_cents as f64 * investment.quantity;
    }

    if cost == 0.0 {
        return Ok(None);
    }
    Ok(Some((value - cost) / cost * 100.0))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_value_cents: i64,
    pub total_cost_cents: i64,
    pub gain_loss_cents: i64,
    pub roi_percent: Option<f64>,
    pub count: usize,
}

pub fn portfolio_summary(investments: &[Investment]) -> LedgerResult<PortfolioSummary> {
    let roi_percent = portfolio_roi(investments)?;
    let total_value_cents = sum_cents(investments.iter().map(|i| i.market_value_cents()));
    let total_cost_cents = sum_cents(investments.iter().map(|i| i.cost_basis_cents()));

    Ok(PortfolioSummary {
        total_value_cents,
        total_cost_cents,
        gain_loss_cents: total_value_cents.saturating_sub(total_cost_cents),
        roi_percent,
        count: investments.len(),
    })
}

/// Holding with the highest ROI at current prices.
pub fn best_investment(investments: &[Investment]) -> Option<&Investment> {
    let rated = investments
        .iter()
        .filter_map(|i| i.roi_percent().map(|roi| (i, roi)));
    first_max_by(rated, |(_, roi)| *roi).map(|(i, _)| i)
}

// Expenses and budgets

pub fn total_spent(expenses: &[Expense]) -> i64 {
    sum_cents(expenses.iter().map(|e| e.amount_cents))
}

pub fn total_budget(budgets: &[Budget]) -> i64 {
    sum_cents(budgets.iter().map(|b| b.limit_cents))
}

pub fn biggest_expense(expenses: &[Expense]) -> Option<&Expense> {
    first_max_by(expenses, |e| e.amount_cents)
}

/// Summed amount per category, one entry for each category present.
pub fn spending_by_category(expenses: &[Expense]) -> BTreeMap<ExpenseCategory, i64> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        let total = totals.entry(expense.category).or_insert(0i64);
        *total = total.saturating_add(expense.amount_cents);
    }
    totals
}

/// The `limit` most recent expenses by date, newest first. On the same date
/// the later-recorded expense comes first.
pub fn recent_expenses(expenses: &[Expense], limit: usize) -> Vec<&Expense> {
    latest_by(expenses, limit, |e| e.date)
}

pub fn spending_breakdown(expenses: &[Expense]) -> Vec<CategoryShare<ExpenseCategory>> {
    shares(
        expenses.iter().map(|e| (e.category, e.amount_cents)),
        ExpenseCategory::label,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: ExpenseCategory,
    pub limit_cents: i64,
    pub spent_cents: i64,
    /// Negative once the budget is overspent.
    pub remaining_cents: i64,
    /// True ratio, may exceed 100.
    pub percent_used: f64,
    /// `percent_used` capped at 100 for progress bars.
    pub display_percent: f64,
    pub over_budget: bool,
}

pub fn budget_status(budget: &Budget) -> BudgetStatus {
    let percent_used = if budget.limit_cents == 0 {
        0.0
    } else {
        budget.spent_cents as f64 / budget.limit_cents as f64 * 100.0
    };

    BudgetStatus {
        category: budget.category,
        limit_cents: budget.limit_cents,
        spent_cents: budget.spent_cents,
        remaining_cents: budget.limit_cents.saturating_sub(budget.spent_cents),
        percent_used,
        display_percent: percent_used.min(100.0),
        over_budget: budget.spent_cents > budget.limit_cents,
    }
}

// Trades

/// Share of closed trades with positive P&L, in percent. 0 when no trade
/// has been closed.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let closed = trades.iter().filter(|t| t.is_closed()).count();
    if closed == 0 {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / closed as f64 * 100.0
}

/// Closed trade with the largest P&L. When every trade lost money the
/// smallest loss is reported.
pub fn best_trade(trades: &[Trade]) -> Option<&Trade> {
    let closed = trades
        .iter()
        .filter_map(|t| t.pnl_cents.filter(|_| t.is_closed()).map(|pnl| (t, pnl)));
    first_max_by(closed, |(_, pnl)| *pnl).map(|(t, _)| t)
}

/// The `limit` most recently opened trades, newest entry date first.
pub fn recent_trades(trades: &[Trade], limit: usize) -> Vec<&Trade> {
    latest_by(trades, limit, |t| t.entry_date)
}

fn latest_by<T>(items: &[T], limit: usize, date: fn(&T) -> NaiveDate) -> Vec<&T> {
    let mut newest: Vec<&T> = items.iter().rev().collect();
    newest.sort_by_key(|item| std::cmp::Reverse(date(item)));
    newest.truncate(limit);
    newest
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingStats {
    pub total_pnl_cents: i64,
    pub win_rate: f64,
    pub open_count: usize,
    pub closed_count: usize,
    pub winning_count: usize,
    pub best_trade: Option<Trade>,
}

pub fn trading_stats(trades: &[Trade]) -> TradingStats {
    TradingStats {
        total_pnl_cents: sum_cents(
            trades
                .iter()
                .filter(|t| t.is_closed())
                .filter_map(|t| t.pnl_cents),
        ),
        win_rate: win_rate(trades),
        open_count: trades.iter().filter(|t| t.is_open()).count(),
        closed_count: trades.iter().filter(|t| t.is_closed()).count(),
        winning_count: trades.iter().filter(|t| t.is_winner()).count(),
        best_trade: best_trade(trades).cloned(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlPoint {
    pub date: NaiveDate,
    pub symbol: String,
    pub pnl_cents: i64,
    pub cumulative_cents: i64,
}

/// Running realised P&L over closed trades, ordered by exit date.
pub fn cumulative_pnl(trades: &[Trade]) -> Vec<PnlPoint> {
    let mut closed: Vec<(NaiveDate, &Trade, i64)> = trades
        .iter()
        .filter(|t| t.is_closed())
        .filter_map(|t| Some((t.exit_date?, t, t.pnl_cents?)))
        .collect();
    closed.sort_by_key(|(date, _, _)| *date);

    let mut running: i64 = 0;
    closed
        .into_iter()
        .map(|(date, trade, pnl)| {
            running = running.saturating_add(pnl);
            PnlPoint {
                date,
                symbol: trade.symbol.clone(),
                pnl_cents: pnl,
                cumulative_cents: running,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyPerformance {
    pub strategy: String,
    pub trade_count: usize,
    pub closed_count: usize,
    pub win_rate: f64,
    pub pnl_cents: i64,
}

pub fn strategy_performance(trades: &[Trade]) -> Vec<StrategyPerformance> {
    let mut by_strategy: BTreeMap<&str, Vec<Trade>> = BTreeMap::new();
    for trade in trades {
        by_strategy
            .entry(trade.strategy.as_str())
            .or_default()
            .push(trade.clone());
    }

    by_strategy
        .into_iter()
        .map(|(strategy, group)| StrategyPerformance {
            strategy: strategy.to_string(),
            trade_count: group.len(),
            closed_count: group.iter().filter(|t| t.is_closed()).count(),
            win_rate: win_rate(&group),
            pnl_cents: sum_cents(
                group
                    .iter()
                    .filter(|t| t.is_closed())
                    .filter_map(|t| t.pnl_cents),
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvestmentCategory, TradeSide, TradeStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn asset(name: &str, category: AssetCategory, value_cents: i64, growth: Option<f64>) -> Asset {
        Asset {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            value_cents,
            growth_rate: growth,
            notes: None,
            last_updated: Utc::now(),
        }
    }

    fn investment(buy_cents: i64, current_cents: i64, quantity: f64) -> Investment {
        Investment {
            id: Uuid::new_v4(),
            name: "Holding".into(),
            category: InvestmentCategory::Stocks,
            buy_price_cents: buy_cents,
            current_price_cents: current_cents,
            quantity,
            notes: None,
            last_updated: Utc::now(),
        }
    }

    fn trade(strategy: &str, pnl: Option<i64>, exit_day: u32) -> Trade {
        Trade {
            id: Uuid::new_v4(),
            symbol: "AAPL".into(),
            side: TradeSide::Buy,
            strategy: strategy.into(),
            entry_price_cents: 10_000,
            exit_price_cents: pnl.map(|p| 10_000 + p),
            quantity: 1.0,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            exit_date: pnl.map(|_| NaiveDate::from_ymd_opt(2024, 2, exit_day).unwrap()),
            pnl_cents: pnl,
            notes: None,
            status: if pnl.is_some() {
                TradeStatus::Closed
            } else {
                TradeStatus::Open
            },
        }
    }

    fn expense(category: ExpenseCategory, amount_cents: i64) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            name: "Item".into(),
            category,
            amount_cents,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_recent_expenses_newest_first() {
        let mut expenses: Vec<Expense> = (1..=12)
            .map(|day| {
                let mut e = expense(ExpenseCategory::Food, day as i64 * 100);
                e.date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
                e
            })
            .collect();
        expenses.swap(0, 11);

        let recent = recent_expenses(&expenses, 10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].date, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
        assert_eq!(recent[9].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
    }

    #[test]
    fn test_recent_trades_by_entry_date() {
        let mut older = trade("Swing", None, 1);
        older.entry_date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        older.symbol = "OLD".into();
        let newer = trade("Swing", None, 1);

        let trades = vec![newer.clone(), older];
        let recent = recent_trades(&trades, 5);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, newer.id);
        assert_eq!(recent_trades(&trades, 1).len(), 1);
        assert!(recent_trades(&[], 5).is_empty());
    }

    #[test]
    fn test_total_value_empty() {
        assert_eq!(total_value(&[]), 0);
    }

    #[test]
    fn test_totals_pin_instead_of_overflowing() {
        let assets = vec![
            asset("Vault", AssetCategory::Cash, i64::MAX - 1, None),
            asset("Vault", AssetCategory::Cash, i64::MAX - 1, None),
        ];
        assert_eq!(total_value(&assets), i64::MAX);
        assert_eq!(asset_allocation(&assets)[0].total_cents, i64::MAX);

        let whales = vec![investment(1, 10_000_000_000_000_00, 1e12)];
        let summary = portfolio_summary(&whales).unwrap();
        assert_eq!(summary.total_value_cents, i64::MAX);
        assert_eq!(summary.gain_loss_cents, i64::MAX - 1_000_000_000_000);
    }

    #[test]
    fn test_total_value_is_order_independent() {
        let mut assets = vec![
            asset("Checking", AssetCategory::Cash, 12_500_00, None),
            asset("Index fund", AssetCategory::Stocks, 48_000_00, Some(7.0)),
            asset("House", AssetCategory::RealEstate, 350_000_00, Some(3.5)),
        ];
        let forward = total_value(&assets);
        assets.reverse();
        assert_eq!(forward, 410_500_00);
        assert_eq!(total_value(&assets), forward);
    }

    #[test]
    fn test_best_performing_ties_keep_first() {
        let assets = vec![
            asset("Cash", AssetCategory::Cash, 100, None),
            asset("A", AssetCategory::Stocks, 100, Some(8.0)),
            asset("B", AssetCategory::Crypto, 100, Some(8.0)),
        ];
        let best = best_performing(&assets).unwrap().unwrap();
        assert_eq!(best.name, "A");
    }

    #[test]
    fn test_best_performing_reports_negative_growth() {
        let assets = vec![
            asset("A", AssetCategory::Stocks, 100, Some(-12.0)),
            asset("B", AssetCategory::Crypto, 100, Some(-3.0)),
        ];
        assert_eq!(best_performing(&assets).unwrap().unwrap().name, "B");
    }

    #[test]
    fn test_best_performing_empty_is_none() {
        assert!(best_performing(&[]).unwrap().is_none());
    }

    #[test]
    fn test_best_performing_rejects_nan() {
        let assets = vec![asset("A", AssetCategory::Stocks, 100, Some(f64::NAN))];
        assert!(matches!(
            best_performing(&assets),
            Err(LedgerError::Validation { field: "growth_rate", .. })
        ));
    }

    #[test]
    fn test_asset_allocation_percentages() {
        let assets = vec![
            asset("Checking", AssetCategory::Cash, 25_00, None),
            asset("Savings", AssetCategory::Cash, 25_00, None),
            asset("Fund", AssetCategory::Stocks, 50_00, None),
        ];
        let allocation = asset_allocation(&assets);
        assert_eq!(allocation.len(), 2);
        let cash = allocation
            .iter()
            .find(|s| s.category == AssetCategory::Cash)
            .unwrap();
        assert_eq!(cash.total_cents, 50_00);
        assert_eq!(cash.count, 2);
        assert!((cash.percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_portfolio_roi_example() {
        let investments = vec![investment(150_00, 185_50, 50.0), investment(35_000_00, 42_500_00, 0.5)];
        let roi = portfolio_roi(&investments).unwrap().unwrap();
        assert!((roi - 22.1).abs() < 1e-9);

        let summary = portfolio_summary(&investments).unwrap();
        assert_eq!(summary.total_cost_cents, 25_000_00);
        assert_eq!(summary.total_value_cents, 30_525_00);
        assert_eq!(summary.gain_loss_cents, 5_525_00);
    }

    #[test]
    fn test_portfolio_roi_zero_cost_is_none() {
        assert_eq!(portfolio_roi(&[]).unwrap(), None);
        assert_eq!(portfolio_roi(&[investment(100, 200, 0.0)]).unwrap(), None);
    }

    #[test]
    fn test_portfolio_roi_rejects_bad_quantity() {
        assert!(portfolio_roi(&[investment(100, 200, -1.0)]).is_err());
        assert!(portfolio_roi(&[investment(100, 200, f64::INFINITY)]).is_err());
    }

    #[test]
    fn test_best_investment() {
        let investments = vec![investment(100_00, 110_00, 1.0), investment(100_00, 150_00, 1.0)];
        let best = best_investment(&investments).unwrap();
        assert_eq!(best.current_price_cents, 150_00);
    }

    #[test]
    fn test_spending_by_category() {
        let expenses = vec![
            expense(ExpenseCategory::Food, 12_50),
            expense(ExpenseCategory::Transport, 40_00),
            expense(ExpenseCategory::Food, 7_50),
        ];
        let totals = spending_by_category(&expenses);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&ExpenseCategory::Food], 20_00);
        assert_eq!(totals[&ExpenseCategory::Transport], 40_00);
        assert_eq!(total_spent(&expenses), 60_00);
        assert_eq!(biggest_expense(&expenses).unwrap().amount_cents, 40_00);
    }

    #[test]
    fn test_budget_status_over_budget() {
        let budget = Budget {
            category: ExpenseCategory::Food,
            limit_cents: 400_00,
            spent_cents: 450_00,
        };
        let status = budget_status(&budget);
        assert!(status.over_budget);
        assert!((status.percent_used - 112.5).abs() < 1e-9);
        assert_eq!(status.display_percent, 100.0);
        assert_eq!(status.remaining_cents, -50_00);
    }

    #[test]
    fn test_budget_status_zero_limit() {
        let status = budget_status(&Budget::new(ExpenseCategory::Misc, 0));
        assert_eq!(status.percent_used, 0.0);
        assert!(!status.over_budget);
    }

    #[test]
    fn test_win_rate_without_closed_trades() {
        assert_eq!(win_rate(&[]), 0.0);
        assert_eq!(win_rate(&[trade("Breakout", None, 1)]), 0.0);
    }

    #[test]
    fn test_win_rate_counts_closed_only() {
        let trades = vec![
            trade("Breakout", Some(500), 1),
            trade("Breakout", Some(-200), 2),
            trade("Breakout", None, 3),
            trade("Swing", Some(100), 4),
        ];
        let rate = win_rate(&trades);
        assert!((rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_trade_when_all_lose() {
        let trades = vec![trade("Swing", Some(-900), 1), trade("Swing", Some(-100), 2)];
        assert_eq!(best_trade(&trades).unwrap().pnl_cents, Some(-100));
        assert!(best_trade(&[trade("Swing", None, 1)]).is_none());
    }

    #[test]
    fn test_trading_stats_and_cumulative_pnl() {
        let trades = vec![
            trade("Swing", Some(300), 20),
            trade("Breakout", Some(-100), 5),
            trade("Swing", None, 1),
        ];
        let stats = trading_stats(&trades);
        assert_eq!(stats.total_pnl_cents, 200);
        assert_eq!(stats.open_count, 1);
        assert_eq!(stats.closed_count, 2);
        assert_eq!(stats.winning_count, 1);

        let curve = cumulative_pnl(&trades);
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].pnl_cents, -100);
        assert_eq!(curve[1].cumulative_cents, 200);
    }

    #[test]
    fn test_strategy_performance_groups_by_name() {
        let trades = vec![
            trade("Swing", Some(300), 1),
            trade("Breakout", Some(-100), 2),
            trade("Swing", None, 3),
        ];
        let perf = strategy_performance(&trades);
        assert_eq!(perf.len(), 2);
        assert_eq!(perf[0].strategy, "Breakout");
        let swing = &perf[1];
        assert_eq!(swing.trade_count, 2);
        assert_eq!(swing.closed_count, 1);
        assert_eq!(swing.win_rate, 100.0);
        assert_eq!(swing.pnl_cents, 300);
    }
}
