use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::parse_column;
use crate::models::Asset;

const COLUMNS: &str = "id, name, category, value_cents, growth_rate, notes, last_updated";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Asset> {
    Ok(Asset {
        id: row.get(0)?,
        name: row.get(1)?,
        category: parse_column(2, row.get(2)?)?,
        value_cents: row.get(3)?,
        growth_rate: row.get(4)?,
        notes: row.get(5)?,
        last_updated: row.get(6)?,
    })
}

pub fn list_assets(conn: &Connection) -> rusqlite::Result<Vec<Asset>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM assets ORDER BY rowid"))?;
    let assets = stmt
        .query_map([], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(assets)
}

pub fn get_asset(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Asset>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM assets WHERE id = ?"),
        [id],
        from_row,
    )
    .optional()
}

pub fn insert_asset(conn: &Connection, asset: &Asset) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO assets (id, name, category, value_cents, growth_rate, notes, last_updated)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            asset.id,
            asset.name,
            asset.category.as_str(),
            asset.value_cents,
            asset.growth_rate,
            asset.notes,
            asset.last_updated
        ],
    )?;
    debug!(asset_id = %asset.id, name = %asset.name, "Created asset");
    Ok(())
}

pub fn update_asset(conn: &Connection, asset: &Asset) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE assets SET name = ?, category = ?, value_cents = ?, growth_rate = ?,
         notes = ?, last_updated = ? WHERE id = ?",
        params![
            asset.name,
            asset.category.as_str(),
            asset.value_cents,
            asset.growth_rate,
            asset.notes,
            asset.last_updated,
            asset.id
        ],
    )?;
    if rows > 0 {
        debug!(asset_id = %asset.id, value_cents = asset.value_cents, "Updated asset");
    }
    Ok(rows > 0)
}

pub fn delete_asset(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM assets WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(asset_id = %id, "Deleted asset");
    }
    Ok(rows > 0)
}
