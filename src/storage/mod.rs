//! Task persistence.
//!
//! [`TaskRepository`] is the seam the service layer is generic over. Two
//! implementations ship: [`MemoryStorage`] (process-lifetime, the default)
//! and [`SqliteStorage`] (a file-backed database).
//!
//! Repositories answer absence with `Option`/`bool`; they never invent
//! not-found errors.

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};
use crate::model::{Task, TaskId};
use crate::query::{self, TaskFilter};

/// Storage operations over the task collection.
///
/// `all` returns tasks in insertion order. Ordering for presentation is the
/// query engine's job.
pub trait TaskRepository {
    /// Every stored task, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn all(&self) -> Result<Vec<Task>>;

    /// Look up a task by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, id: &TaskId) -> Result<Option<Task>>;

    /// Store a new task.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (e.g. ID collision).
    fn insert(&mut self, task: Task) -> Result<()>;

    /// Overwrite the stored record with the same ID.
    ///
    /// Returns `false` if no such task exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn replace(&mut self, task: Task) -> Result<bool>;

    /// Delete one task. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&mut self, id: &TaskId) -> Result<bool>;

    /// Number of stored tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn count(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }

    /// Tasks matching `filter`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn filtered(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(query::filter(self.all()?, filter))
    }

    /// Delete every completed task and return how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove_completed(&mut self) -> Result<usize> {
        let ids = query::completed_ids(&self.all()?);
        let mut removed = 0;
        for id in &ids {
            if self.remove(id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl<R: TaskRepository + ?Sized> TaskRepository for Box<R> {
    fn all(&self) -> Result<Vec<Task>> {
        (**self).all()
    }

    fn get(&self, id: &TaskId) -> Result<Option<Task>> {
        (**self).get(id)
    }

    fn insert(&mut self, task: Task) -> Result<()> {
        (**self).insert(task)
    }

    fn replace(&mut self, task: Task) -> Result<bool> {
        (**self).replace(task)
    }

    fn remove(&mut self, id: &TaskId) -> Result<bool> {
        (**self).remove(id)
    }

    fn count(&self) -> Result<usize> {
        (**self).count()
    }

    fn filtered(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        (**self).filtered(filter)
    }

    fn remove_completed(&mut self) -> Result<usize> {
        (**self).remove_completed()
    }
}

/// Which storage backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Memory,
    Sqlite,
}

impl StorageKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

impl FromStr for StorageKind {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(TaskError::Config(format!(
                "unknown storage '{other}' (use memory or sqlite)"
            ))),
        }
    }
}

/// A type-erased repository that can be moved across threads.
pub type DynRepository = Box<dyn TaskRepository + Send>;

/// Open the configured backend.
///
/// # Errors
///
/// Returns an error if the `SQLite` database cannot be opened.
pub fn open_repository(kind: StorageKind, db_path: &Path) -> Result<DynRepository> {
    match kind {
        StorageKind::Memory => Ok(Box::new(MemoryStorage::new())),
        StorageKind::Sqlite => Ok(Box::new(SqliteStorage::open(db_path)?)),
    }
}
