use serde::{Deserialize, Serialize};

/// Net worth at the close of one period. Only [`NetWorthSnapshot::new`]
/// builds one, so `net_worth_cents` always equals assets minus liabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWorthSnapshot {
    pub period: String,
    pub total_assets_cents: i64,
    pub total_liabilities_cents: i64,
    pub net_worth_cents: i64,
}

impl NetWorthSnapshot {
    pub fn new(period: impl Into<String>, total_assets_cents: i64, total_liabilities_cents: i64) -> Self {
        Self {
            period: period.into(),
            total_assets_cents,
            total_liabilities_cents,
            net_worth_cents: total_assets_cents.saturating_sub(total_liabilities_cents),
        }
    }
}

/// Period-over-period change in net worth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetWorthDelta {
    pub absolute_cents: i64,
    /// `None` when the previous net worth was zero.
    pub percent: Option<f64>,
}

/// A single point in the net worth timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetWorthPoint {
    pub period: String,
    pub total_assets_cents: i64,
    pub total_liabilities_cents: i64,
    pub net_worth_cents: i64,
    /// Change against the preceding period; `None` for the first point.
    pub change: Option<NetWorthDelta>,
}

/// Summary of the recorded net worth series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetWorthHistory {
    pub points: Vec<NetWorthPoint>,
    pub current_net_worth_cents: i64,
    pub highest_net_worth_cents: i64,
    pub lowest_net_worth_cents: i64,
    pub start_period: String,
    pub end_period: String,
    /// Change between the last two periods.
    pub latest_change: Option<NetWorthDelta>,
}

impl NetWorthHistory {
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            current_net_worth_cents: 0,
            highest_net_worth_cents: 0,
            lowest_net_worth_cents: 0,
            start_period: String::new(),
            end_period: String::new(),
            latest_change: None,
        }
    }

    pub fn from_points(points: Vec<NetWorthPoint>) -> Self {
        if points.is_empty() {
            return Self::empty();
        }

        let current = points.last().map(|p| p.net_worth_cents).unwrap_or(0);
        let highest = points.iter().map(|p| p.net_worth_cents).max().unwrap_or(0);
        let lowest = points.iter().map(|p| p.net_worth_cents).min().unwrap_or(0);
        let start_period = points.first().map(|p| p.period.clone()).unwrap_or_default();
        let end_period = points.last().map(|p| p.period.clone()).unwrap_or_default();
        let latest_change = points.last().and_then(|p| p.change);

        Self {
            points,
            current_net_worth_cents: current,
            highest_net_worth_cents: highest,
            lowest_net_worth_cents: lowest,
            start_period,
            end_period,
            latest_change,
        }
    }
}
