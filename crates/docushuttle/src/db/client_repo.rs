//! Recipient profiles: one saved [`RunSettings`] per recipient
//! in the `clients` table.

use rusqlite::{params, OptionalExtension};

use crate::config::schema::{RunSettings, DEFAULT_TIMEZONE};

use super::{forwarded_repo, Database, DatabaseError};

/// Inserts or replaces the profile for `settings.recipient`. Profiles are
/// keyed by the lowercased address, like forward history.
pub fn save(db: &Database, settings: &RunSettings, created_at: &str) -> Result<(), DatabaseError> {
    let key = forwarded_repo::normalize_recipient(&settings.recipient);
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        // Rows written before keys were lowercased may differ only by case.
        tx.execute("DELETE FROM clients WHERE lower(recipient) = ?1", params![key])?;
        tx.execute(
            "INSERT OR REPLACE INTO clients
                (recipient, start_date, end_date, file_number_prefix, subject_keyword,
                 require_attachments, skip_forwarded, delay_seconds, created_at, timezone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                key,
                settings.start_date,
                settings.end_date,
                settings.file_number_prefix,
                settings.subject_keyword,
                settings.require_attachments,
                settings.skip_forwarded,
                settings.delay_seconds,
                created_at,
                settings.timezone,
            ],
        )?;
        tx.commit()?;
        Ok(())
    })
}

pub fn find(db: &Database, recipient: &str) -> Result<Option<RunSettings>, DatabaseError> {
    let key = forwarded_repo::normalize_recipient(recipient);
    db.with_conn(|conn| {
        let settings = conn
            .query_row(
                "SELECT recipient, start_date, end_date, file_number_prefix, subject_keyword,
                        require_attachments, skip_forwarded, delay_seconds, timezone
                 FROM clients WHERE lower(recipient) = ?1",
                params![key],
                |row| {
                    Ok(RunSettings {
                        recipient: row.get(0)?,
                        start_date: row.get(1)?,
                        end_date: row.get(2)?,
                        file_number_prefix: row.get(3)?,
                        subject_keyword: row.get(4)?,
                        require_attachments: row.get(5)?,
                        skip_forwarded: row.get(6)?,
                        delay_seconds: row.get(7)?,
                        timezone: row
                            .get::<_, Option<String>>(8)?
                            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
                    })
                },
            )
            .optional()?;
        Ok(settings)
    })
}

/// Lists every saved recipient, sorted.
pub fn list_recipients(db: &Database) -> Result<Vec<String>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT DISTINCT recipient FROM clients ORDER BY recipient")?;
        let recipients = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipients)
    })
}

/// Deletes a recipient's profile together with its forward history.
/// Returns false, leaving the history alone, if no profile existed.
pub fn delete(db: &Database, recipient: &str) -> Result<bool, DatabaseError> {
    let key = forwarded_repo::normalize_recipient(recipient);
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM clients WHERE lower(recipient) = ?1",
            params![key],
        )?;
        if removed == 0 {
            return Ok(false);
        }
        let history = tx.execute(
            "DELETE FROM forwarded_emails WHERE recipient = ?1",
            params![key],
        )?;
        tx.commit()?;
        log::info!(
            "Deleted profile for '{}' ({} forward records removed)",
            recipient,
            history
        );
        Ok(removed > 0)
    })
}
