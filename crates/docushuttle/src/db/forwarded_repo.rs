//! Queries on the `forwarded_emails` table.
//!
//! Rows are keyed by `(tracking_id, recipient)`. Recipients are lowercased
//! here, on every read and write, so callers never need to normalize.

use rusqlite::{params, OptionalExtension};

use super::{Database, DatabaseError};

/// A raw forwarded email row from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedEmailRow {
    pub tracking_id: String,
    pub recipient: String,
    /// RFC 3339 timestamp of the most recent forward.
    pub forwarded_at: String,
}

/// Normalizes a recipient address for use as a key.
pub fn normalize_recipient(recipient: &str) -> String {
    recipient.trim().to_lowercase()
}

/// Inserts or replaces the record for `(tracking_id, recipient)`.
pub fn upsert(
    db: &Database,
    tracking_id: &str,
    recipient: &str,
    forwarded_at: &str,
) -> Result<(), DatabaseError> {
    let recipient = normalize_recipient(recipient);
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO forwarded_emails (tracking_id, recipient, forwarded_at)
             VALUES (?1, ?2, ?3)",
            params![tracking_id, recipient, forwarded_at],
        )?;
        Ok(())
    })
}

/// Returns true when `(tracking_id, recipient)` has a record.
pub fn exists(db: &Database, tracking_id: &str, recipient: &str) -> Result<bool, DatabaseError> {
    let recipient = normalize_recipient(recipient);
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM forwarded_emails WHERE tracking_id = ?1 AND recipient = ?2",
            params![tracking_id, recipient],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    })
}

pub fn find(
    db: &Database,
    tracking_id: &str,
    recipient: &str,
) -> Result<Option<ForwardedEmailRow>, DatabaseError> {
    let recipient = normalize_recipient(recipient);
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT tracking_id, recipient, forwarded_at FROM forwarded_emails
                 WHERE tracking_id = ?1 AND recipient = ?2",
                params![tracking_id, recipient],
                |row| {
                    Ok(ForwardedEmailRow {
                        tracking_id: row.get(0)?,
                        recipient: row.get(1)?,
                        forwarded_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    })
}

/// Counts forward records for a recipient.
pub fn count_by_recipient(db: &Database, recipient: &str) -> Result<u64, DatabaseError> {
    let recipient = normalize_recipient(recipient);
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM forwarded_emails WHERE recipient = ?1",
            params![recipient],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// Deletes every record for a recipient. Returns the number of rows deleted.
pub fn delete_by_recipient(db: &Database, recipient: &str) -> Result<u64, DatabaseError> {
    let recipient = normalize_recipient(recipient);
    db.with_conn(|conn| {
        let count = conn.execute(
            "DELETE FROM forwarded_emails WHERE recipient = ?1",
            params![recipient],
        )?;
        Ok(count as u64)
    })
}
