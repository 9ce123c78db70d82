use rusqlite::{params, Connection};
use tracing::debug;

use crate::models::NetWorthSnapshot;

/// Snapshots in the order they were recorded.
pub fn list_snapshots(conn: &Connection) -> rusqlite::Result<Vec<NetWorthSnapshot>> {
    let mut stmt = conn.prepare(
        "SELECT period, total_assets_cents, total_liabilities_cents
         FROM net_worth_snapshots
         ORDER BY rowid",
    )?;
    let snapshots = stmt
        .query_map([], |row| {
            Ok(NetWorthSnapshot::new(
                row.get::<_, String>(0)?,
                row.get(1)?,
                row.get(2)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(snapshots)
}

pub fn insert_snapshot(conn: &Connection, snapshot: &NetWorthSnapshot) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO net_worth_snapshots
             (period, total_assets_cents, total_liabilities_cents, net_worth_cents)
         VALUES (?, ?, ?, ?)",
        params![
            snapshot.period,
            snapshot.total_assets_cents,
            snapshot.total_liabilities_cents,
            snapshot.net_worth_cents
        ],
    )?;
    debug!(
        period = %snapshot.period,
        net_worth_cents = snapshot.net_worth_cents,
        "Recorded net worth snapshot"
    );
    Ok(())
}
