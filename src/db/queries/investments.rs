use rusqlite::{params, Connection, Row};
use tracing::debug;
use uuid::Uuid;

use super::parse_column;
use crate::models::Investment;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Investment> {
    Ok(Investment {
        id: row.get(0)?,
        name: row.get(1)?,
        category: parse_column(2, row.get(2)?)?,
        buy_price_cents: row.get(3)?,
        current_price_cents: row.get(4)?,
        quantity: row.get(5)?,
        notes: row.get(6)?,
        last_updated: row.get(7)?,
    })
}

pub fn list_investments(conn: &Connection) -> rusqlite::Result<Vec<Investment>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category, buy_price_cents, current_price_cents, quantity, notes,
                last_updated
         FROM investments
         ORDER BY rowid",
    )?;
    let investments = stmt
        .query_map([], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(investments)
}

pub fn insert_investment(conn: &Connection, investment: &Investment) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO investments (id, name, category, buy_price_cents, current_price_cents,
                                  quantity, notes, last_updated)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            investment.id,
            investment.name,
            investment.category.as_str(),
            investment.buy_price_cents,
            investment.current_price_cents,
            investment.quantity,
            investment.notes,
            investment.last_updated
        ],
    )?;
    debug!(investment_id = %investment.id, name = %investment.name, "Created investment");
    Ok(())
}

pub fn update_investment(conn: &Connection, investment: &Investment) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE investments SET name = ?, category = ?, buy_price_cents = ?,
         current_price_cents = ?, quantity = ?, notes = ?, last_updated = ? WHERE id = ?",
        params![
            investment.name,
            investment.category.as_str(),
            investment.buy_price_cents,
            investment.current_price_cents,
            investment.quantity,
            investment.notes,
            investment.last_updated,
            investment.id
        ],
    )?;
    if rows > 0 {
        debug!(
            investment_id = %investment.id,
            current_price_cents = investment.current_price_cents,
            "Updated investment"
        );
    }
    Ok(rows > 0)
}

pub fn delete_investment(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM investments WHERE id = ?", [id])?;
    Ok(rows > 0)
}
