//! `SQLite` storage implementation.

use crate::error::Result;
use crate::model::{Task, TaskId};
use crate::query::TaskFilter;
use crate::storage::TaskRepository;
use crate::storage::schema::apply_schema;
use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const TASK_COLUMNS: &str = "id, title, description, is_completed, created_at, completed_at";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// File-backed task store. `rowid` order is insertion order.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (creating if needed) the database at `path`.
    ///
    /// Writers wait up to five seconds for a competing lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot be applied.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened task database");
        Ok(Self { conn })
    }

    /// A private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Run `f` inside an immediate transaction, committing on success.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails. The transaction is rolled back on error.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        debug!(op, "Committed mutation");
        Ok(result)
    }

    fn query_tasks(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let tasks = stmt
            .query_map(params, task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }
}

impl TaskRepository for SqliteStorage {
    fn all(&self) -> Result<Vec<Task>> {
        self.query_tasks(
            &format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY rowid"),
            &[],
        )
    }

    fn get(&self, id: &TaskId) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"),
                [id.to_string()],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    fn insert(&mut self, task: Task) -> Result<()> {
        self.mutate("insert_task", |tx| {
            tx.execute(
                &format!("INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"),
                rusqlite::params![
                    task.id.to_string(),
                    task.title,
                    task.description,
                    task.is_completed,
                    format_datetime(&task.created_at),
                    task.completed_at.as_ref().map(format_datetime),
                ],
            )?;
            Ok(())
        })
    }

    fn replace(&mut self, task: Task) -> Result<bool> {
        self.mutate("replace_task", |tx| {
            let changed = tx.execute(
                "UPDATE tasks
                 SET title = ?, description = ?, is_completed = ?, completed_at = ?
                 WHERE id = ?",
                rusqlite::params![
                    task.title,
                    task.description,
                    task.is_completed,
                    task.completed_at.as_ref().map(format_datetime),
                    task.id.to_string(),
                ],
            )?;
            Ok(changed > 0)
        })
    }

    fn remove(&mut self, id: &TaskId) -> Result<bool> {
        self.mutate("remove_task", |tx| {
            let changed = tx.execute("DELETE FROM tasks WHERE id = ?", [id.to_string()])?;
            Ok(changed > 0)
        })
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM tasks", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn filtered(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(completed) = filter.is_completed {
            sql.push_str(" AND is_completed = ?");
            params.push(Box::new(completed));
        }

        // Stored timestamps have four-digit years. A bound past 9999 formats as
        // `+10000-...` and sorts before all of them, so handle it without SQL:
        // as a start it matches nothing, as an end it excludes nothing.
        if let Some(from) = filter.created_from() {
            if from.year() > 9999 {
                sql.push_str(" AND 0");
            } else {
                sql.push_str(" AND created_at >= ?");
                params.push(Box::new(format_datetime(&from)));
            }
        }

        if let Some(before) = filter.created_before().filter(|dt| dt.year() <= 9999) {
            sql.push_str(" AND created_at < ?");
            params.push(Box::new(format_datetime(&before)));
        }

        sql.push_str(" ORDER BY rowid");

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(AsRef::as_ref).collect();
        self.query_tasks(&sql, &param_refs)
    }

    fn remove_completed(&mut self) -> Result<usize> {
        self.mutate("remove_completed", |tx| {
            let removed = tx.execute("DELETE FROM tasks WHERE is_completed = 1", [])?;
            Ok(removed)
        })
    }
}

fn task_from_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let id: String = row.get(0)?;
    let id = id
        .parse::<TaskId>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    Ok(Task {
        id,
        title: row.get(1)?,
        description: row.get(2)?,
        is_completed: row.get(3)?,
        created_at: parse_datetime(4, &row.get::<_, String>(4)?)?,
        completed_at: row
            .get::<_, Option<String>>(5)?
            .map(|s| parse_datetime(5, &s))
            .transpose()?,
    })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    Err(rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        format!("invalid timestamp '{s}'").into(),
    ))
}
