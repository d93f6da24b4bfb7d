use std::collections::HashMap;

use rusqlite::{named_params, Connection};

use crate::error::AppResult;

pub struct SettingsRepository;

impl SettingsRepository {
    /// All stored settings as `key -> raw value`.
    pub fn load_all(conn: &Connection) -> AppResult<HashMap<String, String>> {
        let mut stmt = conn.prepare("SELECT key, value FROM app_settings")?;

        let entries = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(entries)
    }

    /// Writes every entry or none of them.
    pub fn upsert_many(conn: &Connection, entries: &[(&str, String)]) -> AppResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                    INSERT INTO app_settings (key, value)
                    VALUES (:key, :value)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = CURRENT_TIMESTAMP
                "#,
            )?;
            for (key, value) in entries {
                stmt.execute(named_params! {":key": key, ":value": value})?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    pub fn last_updated(conn: &Connection) -> AppResult<Option<String>> {
        let value = conn.query_row("SELECT MAX(updated_at) FROM app_settings", [], |row| {
            row.get::<_, Option<String>>(0)
        })?;
        Ok(value)
    }
}
