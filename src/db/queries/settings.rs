use rusqlite::{params, Connection};
use std::collections::HashMap;

use crate::models::Settings;

pub fn get_all_settings(conn: &Connection) -> rusqlite::Result<HashMap<String, String>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
    let settings = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<rusqlite::Result<HashMap<_, _>>>()?;
    Ok(settings)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value, updated_at)
         VALUES (?, ?, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_settings(conn: &Connection) -> rusqlite::Result<Settings> {
    Ok(Settings::from_map(get_all_settings(conn)?))
}

pub fn save_settings(conn: &Connection, settings: &Settings) -> rusqlite::Result<()> {
    for (key, value) in settings.to_map() {
        set_setting(conn, &key, &value)?;
    }
    tracing::debug!(currency = %settings.currency, "Saved settings");
    Ok(())
}
