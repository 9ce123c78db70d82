use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::{debug, trace};
use uuid::Uuid;

use super::parse_column;
use crate::models::{Expense, ExpenseCategory};

#[derive(Debug, Default, Clone)]
pub struct ExpenseFilter {
    pub category: Option<ExpenseCategory>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        name: row.get(1)?,
        category: parse_column(2, row.get(2)?)?,
        amount_cents: row.get(3)?,
        date: row.get(4)?,
        notes: row.get(5)?,
    })
}

pub fn list_expenses(conn: &Connection) -> rusqlite::Result<Vec<Expense>> {
    list_expenses_filtered(conn, &ExpenseFilter::default())
}

/// Expenses in submission order, narrowed by `filter`.
pub fn list_expenses_filtered(
    conn: &Connection,
    filter: &ExpenseFilter,
) -> rusqlite::Result<Vec<Expense>> {
    let mut sql = String::from(
        "SELECT id, name, category, amount_cents, date, notes
         FROM expenses
         WHERE 1=1",
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(category) = filter.category {
        sql.push_str(" AND category = ?");
        params_vec.push(Box::new(category.as_str()));
    }
    if let Some(from_date) = filter.from_date {
        sql.push_str(" AND date >= ?");
        params_vec.push(Box::new(from_date));
    }
    if let Some(to_date) = filter.to_date {
        sql.push_str(" AND date <= ?");
        params_vec.push(Box::new(to_date));
    }
    sql.push_str(" ORDER BY rowid");

    trace!(sql = %sql, "Listing expenses");
    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let expenses = stmt
        .query_map(params_refs.as_slice(), from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(expenses)
}

pub fn insert_expense(conn: &Connection, expense: &Expense) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO expenses (id, name, category, amount_cents, date, notes)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            expense.id,
            expense.name,
            expense.category.as_str(),
            expense.amount_cents,
            expense.date,
            expense.notes
        ],
    )?;
    debug!(expense_id = %expense.id, amount_cents = expense.amount_cents, "Created expense");
    Ok(())
}

pub fn update_expense(conn: &Connection, expense: &Expense) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE expenses SET name = ?, category = ?, amount_cents = ?, date = ?, notes = ?
         WHERE id = ?",
        params![
            expense.name,
            expense.category.as_str(),
            expense.amount_cents,
            expense.date,
            expense.notes,
            expense.id
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_expense(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM expenses WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(expense_id = %id, "Deleted expense");
    }
    Ok(rows > 0)
}
