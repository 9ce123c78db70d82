use rusqlite::{params, Connection, Row};
use tracing::debug;
use uuid::Uuid;

use super::parse_column;
use crate::models::Liability;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Liability> {
    Ok(Liability {
        id: row.get(0)?,
        name: row.get(1)?,
        category: parse_column(2, row.get(2)?)?,
        amount_cents: row.get(3)?,
        interest_rate: row.get(4)?,
        monthly_payment_cents: row.get(5)?,
        due_date: row.get(6)?,
        notes: row.get(7)?,
        last_updated: row.get(8)?,
    })
}

pub fn list_liabilities(conn: &Connection) -> rusqlite::Result<Vec<Liability>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category, amount_cents, interest_rate, monthly_payment_cents,
                due_date, notes, last_updated
         FROM liabilities
         ORDER BY rowid",
    )?;
    let liabilities = stmt
        .query_map([], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(liabilities)
}

pub fn insert_liability(conn: &Connection, liability: &Liability) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO liabilities (id, name, category, amount_cents, interest_rate,
                                  monthly_payment_cents, due_date, notes, last_updated)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            liability.id,
            liability.name,
            liability.category.as_str(),
            liability.amount_cents,
            liability.interest_rate,
            liability.monthly_payment_cents,
            liability.due_date,
            liability.notes,
            liability.last_updated
        ],
    )?;
    debug!(liability_id = %liability.id, name = %liability.name, "Created liability");
    Ok(())
}

pub fn update_liability(conn: &Connection, liability: &Liability) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE liabilities SET name = ?, category = ?, amount_cents = ?, interest_rate = ?,
         monthly_payment_cents = ?, due_date = ?, notes = ?, last_updated = ? WHERE id = ?",
        params![
            liability.name,
            liability.category.as_str(),
            liability.amount_cents,
            liability.interest_rate,
            liability.monthly_payment_cents,
            liability.due_date,
            liability.notes,
            liability.last_updated,
            liability.id
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_liability(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM liabilities WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(liability_id = %id, "Deleted liability");
    }
    Ok(rows > 0)
}
