//! Versioned schema for the docushuttle database.
//!
//! Applied versions are recorded in `_migrations`. The timezone column may
//! already exist in databases written by older releases, so that step
//! checks the table first.

use rusqlite::Connection;

use super::error::DatabaseError;

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
    kind: MigrationKind,
}

enum MigrationKind {
    /// Execute the SQL directly.
    Standard,
    /// `ALTER TABLE .. ADD COLUMN`, skipped when the column is present.
    AddColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// All migrations in order. Each is applied at most once.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_clients_table",
        sql: include_str!("sql/001_create_clients.sql"),
        kind: MigrationKind::Standard,
    },
    Migration {
        version: 2,
        description: "create_forwarded_emails_table",
        sql: include_str!("sql/002_create_forwarded_emails.sql"),
        kind: MigrationKind::Standard,
    },
    Migration {
        version: 3,
        description: "create_settings_table",
        sql: include_str!("sql/003_create_settings.sql"),
        kind: MigrationKind::Standard,
    },
    Migration {
        version: 4,
        description: "add_timezone_to_clients",
        sql: include_str!("sql/004_add_timezone_to_clients.sql"),
        kind: MigrationKind::AddColumn {
            table: "clients",
            column: "timezone",
        },
    },
];

/// Highest applied schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32, DatabaseError> {
    ensure_history_table(conn)?;
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?;
    Ok(version)
}

/// Brings the schema up to date. Each migration and its history row are
/// committed together.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    let current = schema_version(conn)?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = conn.unchecked_transaction()?;
        apply(&tx, migration)?;
        tx.execute(
            "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
            rusqlite::params![migration.version, migration.description],
        )?;
        tx.commit()?;
    }

    Ok(())
}

fn ensure_history_table(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;
    Ok(())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<(), DatabaseError> {
    if let MigrationKind::AddColumn { table, column } = &migration.kind {
        if column_exists(conn, table, column)? {
            log::info!(
                "Migration v{} skipped: {}.{} already present",
                migration.version,
                table,
                column
            );
            return Ok(());
        }
    }

    log::info!(
        "Running migration v{}: {}",
        migration.version,
        migration.description
    );
    conn.execute_batch(migration.sql)
        .map_err(|e| DatabaseError::Migration {
            version: migration.version,
            reason: e.to_string(),
        })
}

/// Looks a column up through `PRAGMA table_info`.
fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, DatabaseError> {
    // Identifiers are interpolated, so only alphanumerics and underscores pass.
    if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DatabaseError::Migration {
            version: 0,
            reason: format!("Invalid table name: {}", table),
        });
    }
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    Ok(names.any(|name| name.is_ok_and(|n| n == column)))
}
