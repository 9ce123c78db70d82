use crate::ledger::Ledger;
use crate::models::net_worth::{NetWorthDelta, NetWorthHistory, NetWorthPoint, NetWorthSnapshot};
use crate::services::aggregator::{total_liabilities, total_value};

/// Net worth of the live ledger, labelled with `period`.
pub fn current_net_worth(ledger: &Ledger, period: &str) -> NetWorthSnapshot {
    NetWorthSnapshot::new(
        period,
        total_value(&ledger.assets),
        total_liabilities(&ledger.liabilities),
    )
}

/// Change from `previous` to `current`. The percentage is relative to the
/// previous net worth and is `None` when that was zero.
pub fn net_worth_delta(current: &NetWorthSnapshot, previous: &NetWorthSnapshot) -> NetWorthDelta {
    let absolute_cents = current.net_worth_cents.saturating_sub(previous.net_worth_cents);
    let percent = if previous.net_worth_cents == 0 {
        None
    } else {
        Some(absolute_cents as f64 / previous.net_worth_cents as f64 * 100.0)
    };
    NetWorthDelta {
        absolute_cents,
        percent,
    }
}

/// Builds the timeline from recorded snapshots, in recording order.
pub fn net_worth_history(snapshots: &[NetWorthSnapshot]) -> NetWorthHistory {
    let mut points = Vec::with_capacity(snapshots.len());
    let mut previous: Option<&NetWorthSnapshot> = None;

    for snapshot in snapshots {
        points.push(NetWorthPoint {
            period: snapshot.period.clone(),
            total_assets_cents: snapshot.total_assets_cents,
            total_liabilities_cents: snapshot.total_liabilities_cents,
            net_worth_cents: snapshot.net_worth_cents,
            change: previous.map(|p| net_worth_delta(snapshot, p)),
        });
        previous = Some(snapshot);
    }

    NetWorthHistory::from_points(points)
}

/// Thin out a long timeline for charting. The first, last, highest and
/// lowest points always survive.
pub fn decimate_for_display(points: &[NetWorthPoint], max_points: usize) -> Vec<NetWorthPoint> {
    if points.len() <= max_points || max_points == 0 {
        return points.to_vec();
    }

    let (min_idx, max_idx) = points
        .iter()
        .enumerate()
        .fold((0, 0), |(min_i, max_i), (i, p)| {
            let min_i = if p.net_worth_cents < points[min_i].net_worth_cents {
                i
            } else {
                min_i
            };
            let max_i = if p.net_worth_cents > points[max_i].net_worth_cents {
                i
            } else {
                max_i
            };
            (min_i, max_i)
        });

    let step = points.len() / max_points;
    let last = points.len() - 1;

    points
        .iter()
        .enumerate()
        .filter(|(i, _)| i % step == 0 || *i == last || *i == min_idx || *i == max_idx)
        .map(|(_, p)| p.clone())
        .collect()
}
