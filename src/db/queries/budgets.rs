use rusqlite::{params, Connection};
use tracing::debug;

use super::parse_column;
use crate::models::Budget;

pub fn list_budgets(conn: &Connection) -> rusqlite::Result<Vec<Budget>> {
    let mut stmt =
        conn.prepare("SELECT category, limit_cents, spent_cents FROM budgets ORDER BY rowid")?;
    let budgets = stmt
        .query_map([], |row| {
            Ok(Budget {
                category: parse_column(0, row.get(0)?)?,
                limit_cents: row.get(1)?,
                spent_cents: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(budgets)
}

/// Inserts the budget or overwrites the row for its category.
pub fn upsert_budget(conn: &Connection, budget: &Budget) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO budgets (category, limit_cents, spent_cents) VALUES (?, ?, ?)
         ON CONFLICT(category) DO UPDATE SET
             limit_cents = excluded.limit_cents,
             spent_cents = excluded.spent_cents",
        params![
            budget.category.as_str(),
            budget.limit_cents,
            budget.spent_cents
        ],
    )?;
    debug!(
        category = %budget.category,
        limit_cents = budget.limit_cents,
        spent_cents = budget.spent_cents,
        "Saved budget"
    );
    Ok(())
}
