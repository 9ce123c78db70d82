use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::parse_column;
use crate::models::Trade;

const COLUMNS: &str = "id, symbol, side, strategy, entry_price_cents, exit_price_cents, quantity,
                       entry_date, exit_date, pnl_cents, notes, status";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Trade> {
    Ok(Trade {
        id: row.get(0)?,
        symbol: row.get(1)?,
        side: parse_column(2, row.get(2)?)?,
        strategy: row.get(3)?,
        entry_price_cents: row.get(4)?,
        exit_price_cents: row.get(5)?,
        quantity: row.get(6)?,
        entry_date: row.get(7)?,
        exit_date: row.get(8)?,
        pnl_cents: row.get(9)?,
        notes: row.get(10)?,
        status: parse_column(11, row.get(11)?)?,
    })
}

pub fn list_trades(conn: &Connection) -> rusqlite::Result<Vec<Trade>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM trades ORDER BY rowid"))?;
    let trades = stmt
        .query_map([], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(trades)
}

pub fn get_trade(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Trade>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM trades WHERE id = ?"),
        [id],
        from_row,
    )
    .optional()
}

pub fn insert_trade(conn: &Connection, trade: &Trade) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO trades (id, symbol, side, strategy, entry_price_cents, exit_price_cents,
                             quantity, entry_date, exit_date, pnl_cents, notes, status)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            trade.id,
            trade.symbol,
            trade.side.as_str(),
            trade.strategy,
            trade.entry_price_cents,
            trade.exit_price_cents,
            trade.quantity,
            trade.entry_date,
            trade.exit_date,
            trade.pnl_cents,
            trade.notes,
            trade.status.as_str()
        ],
    )?;
    debug!(trade_id = %trade.id, symbol = %trade.symbol, side = %trade.side, "Opened trade");
    Ok(())
}

pub fn update_trade(conn: &Connection, trade: &Trade) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE trades SET symbol = ?, side = ?, strategy = ?, entry_price_cents = ?,
         exit_price_cents = ?, quantity = ?, entry_date = ?, exit_date = ?, pnl_cents = ?,
         notes = ?, status = ? WHERE id = ?",
        params![
            trade.symbol,
            trade.side.as_str(),
            trade.strategy,
            trade.entry_price_cents,
            trade.exit_price_cents,
            trade.quantity,
            trade.entry_date,
            trade.exit_date,
            trade.pnl_cents,
            trade.notes,
            trade.status.as_str(),
            trade.id
        ],
    )?;
    if rows > 0 {
        debug!(trade_id = %trade.id, status = %trade.status, pnl_cents = ?trade.pnl_cents, "Updated trade");
    }
    Ok(rows > 0)
}

pub fn delete_trade(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM trades WHERE id = ?", [id])?;
    Ok(rows > 0)
}
