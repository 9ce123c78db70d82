use rusqlite::{params, Connection};
use tracing::{debug, warn};
use uuid::Uuid;

use super::parse_column;
use crate::models::Category;

pub fn list_categories(conn: &Connection) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, kind, color
         FROM categories
         ORDER BY rowid",
    )?;
    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                kind: parse_column(2, row.get(2)?)?,
                color: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(categories)
}

pub fn insert_category(conn: &Connection, category: &Category) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO categories (id, name, kind, color) VALUES (?, ?, ?, ?)",
        params![
            category.id,
            category.name,
            category.kind.as_str(),
            category.color
        ],
    )?;
    debug!(category_id = %category.id, name = %category.name, "Created category");
    Ok(())
}

pub fn update_category(conn: &Connection, category: &Category) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE categories SET name = ?, kind = ?, color = ? WHERE id = ?",
        params![
            category.name,
            category.kind.as_str(),
            category.color,
            category.id
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_category(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM categories WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(category_id = %id, "Deleted category");
    } else {
        warn!(category_id = %id, "Category not found for deletion");
    }
    Ok(rows > 0)
}
