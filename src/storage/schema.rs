//! Database schema definitions and migration logic.

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the task database.
///
/// Timestamps are stored as fixed-width UTC RFC3339 text
/// (`YYYY-MM-DDTHH:MM:SS.ffffffZ`) so string comparison matches time order.
/// `rowid` records insertion order.
pub const SCHEMA_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS tasks (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        is_completed INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        completed_at TEXT,
        CHECK (length(trim(title)) >= 1),
        CHECK ((is_completed = 1) = (completed_at IS NOT NULL))
    );

    CREATE INDEX IF NOT EXISTS idx_tasks_is_completed ON tasks(is_completed);
    CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
";

/// Apply the schema to the database.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if version < CURRENT_SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
    }

    // WAL for concurrent readers (ignored for in-memory databases)
    conn.pragma_update(None, "journal_mode", "WAL")?;

    Ok(())
}
