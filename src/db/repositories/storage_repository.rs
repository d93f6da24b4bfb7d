use rusqlite::{named_params, Connection, OptionalExtension};

use crate::error::AppResult;

/// JSON blobs keyed like browser local storage (`stackr-guardrails-{user}`, ...).
pub struct StorageRepository;

impl StorageRepository {
    pub fn get(conn: &Connection, key: &str) -> AppResult<Option<String>> {
        let value = conn
            .query_row(
                "SELECT value FROM app_storage WHERE key = :key",
                named_params! {":key": key},
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    pub fn put(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO app_storage (key, value)
                VALUES (:key, :value)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = CURRENT_TIMESTAMP
            "#,
            named_params! {":key": key, ":value": value},
        )?;

        Ok(())
    }

    /// Returns whether a row was removed.
    pub fn remove(conn: &Connection, key: &str) -> AppResult<bool> {
        let affected = conn.execute(
            "DELETE FROM app_storage WHERE key = :key",
            named_params! {":key": key},
        )?;
        Ok(affected > 0)
    }
}
