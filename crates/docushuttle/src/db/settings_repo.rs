//! Key/value application settings (last used recipient, last date range).

use rusqlite::{params, OptionalExtension};

use super::{Database, DatabaseError};

pub const LAST_USED_EMAIL: &str = "last_used_email";
pub const LAST_START_DATE: &str = "last_start_date";
pub const LAST_END_DATE: &str = "last_end_date";

pub fn set(db: &Database, key: &str, value: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    })
}

pub fn get(db: &Database, key: &str) -> Result<Option<String>, DatabaseError> {
    db.with_conn(|conn| {
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |r| r.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    })
}
