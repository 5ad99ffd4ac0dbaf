//! Task service: the business rules over a [`TaskRepository`].
//!
//! - Creation checks the title is non-blank, then assigns ID and timestamp.
//!   Titles are stored as given.
//! - Updates carry the completion transition rule.
//! - Reads go through the query engine for ordering and pagination.
//!
//! Absence is reported as `Option`/`bool`; mapping to user-visible
//! not-found errors belongs to the callers.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{Result, TaskError};
use crate::model::{PaginatedResult, Task, TaskId, TaskInput};
use crate::query::{self, PageRequest, TaskFilter};
use crate::storage::TaskRepository;

/// Validation reason for a missing or blank title.
pub const TITLE_REQUIRED_REASON: &str = "title is required";

/// Clock used to stamp `created_at`/`completed_at`.
pub type Clock = fn() -> DateTime<Utc>;

/// Business operations over a task repository.
#[derive(Debug)]
pub struct TaskService<R> {
    repo: R,
    clock: Clock,
}

impl<R: TaskRepository> TaskService<R> {
    #[must_use]
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            clock: Utc::now,
        }
    }

    /// Replace the wall clock (used by tests for deterministic stamps).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repo
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Every task, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn all_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = self.repo.all()?;
        query::order_by_recency(&mut tasks);
        Ok(tasks)
    }

    /// One page of every task. Inputs are normalized (`< 1` → defaults).
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn tasks_paginated(&self, page_number: i64, page_size: i64) -> Result<PaginatedResult<Task>> {
        let request = PageRequest::normalized(page_number, page_size);
        Ok(query::paginate(self.repo.all()?, request))
    }

    /// One page of the tasks matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn tasks_filtered(
        &self,
        filter: &TaskFilter,
        page_number: i64,
        page_size: i64,
    ) -> Result<PaginatedResult<Task>> {
        let request = PageRequest::normalized(page_number, page_size);
        Ok(query::paginate(self.repo.filtered(filter)?, request))
    }

    /// Every task whose title or description contains `term`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank term, or a storage error.
    pub fn search_tasks(&self, term: &str) -> Result<Vec<Task>> {
        if term.trim().is_empty() {
            return Err(TaskError::validation("query", query::EMPTY_SEARCH_REASON));
        }
        let found = query::search(self.repo.all()?, term)?;
        debug!(term, matches = found.len(), "Searched tasks");
        Ok(found)
    }

    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn task(&self, id: &TaskId) -> Result<Option<Task>> {
        self.repo.get(id)
    }

    /// Create a task from client input.
    ///
    /// The title must be non-blank. A new task is always incomplete,
    /// whatever `is_completed` the input carries.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title, or a storage error.
    pub fn create_task(&mut self, input: TaskInput) -> Result<Task> {
        if input.trimmed_title().is_none() {
            return Err(TaskError::validation("title", TITLE_REQUIRED_REASON));
        }
        let title = input.title.unwrap_or_default();
        let task = Task::new(title, input.description.unwrap_or_default(), self.now());
        self.repo.insert(task.clone())?;
        info!(id = %task.id, "Created task");
        Ok(task)
    }

    /// Overwrite title/description and apply the completion rule.
    ///
    /// `description` absent keeps the stored text; `is_completed` absent
    /// leaves the flag and `completed_at` untouched. Returns the stored
    /// record, or `None` if the ID is unknown.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title, or a storage error.
    pub fn update_task(&mut self, id: &TaskId, input: TaskInput) -> Result<Option<Task>> {
        if input.trimmed_title().is_none() {
            return Err(TaskError::validation("title", TITLE_REQUIRED_REASON));
        }
        let Some(mut task) = self.repo.get(id)? else {
            return Ok(None);
        };

        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(description) = input.description {
            task.description = description;
        }
        if let Some(completed) = input.is_completed {
            let now = self.now();
            task.apply_completion(completed, now);
        }

        if !self.repo.replace(task.clone())? {
            return Ok(None);
        }
        info!(id = %task.id, completed = task.is_completed, "Updated task");
        Ok(Some(task))
    }

    /// Mark a task completed. Returns `false` if the ID is unknown or the
    /// repository did not apply the change.
    ///
    /// Completing an already-completed task keeps its original `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn complete_task(&mut self, id: &TaskId) -> Result<bool> {
        let Some(mut task) = self.repo.get(id)? else {
            return Ok(false);
        };
        let now = self.now();
        if task.apply_completion(true, now) {
            if !self.repo.replace(task)? {
                warn!(%id, "Completion was not stored");
                return Ok(false);
            }
            info!(%id, "Completed task");
        }
        Ok(true)
    }

    /// Delete one task. Returns `false` if the ID is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<bool> {
        let removed = self.repo.remove(id)?;
        if removed {
            info!(%id, "Deleted task");
        }
        Ok(removed)
    }

    /// Delete every completed task. Returns `false` if there were none.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn delete_completed(&mut self) -> Result<bool> {
        let removed = self.repo.remove_completed()?;
        info!(removed, "Deleted completed tasks");
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    fn service() -> TaskService<MemoryStorage> {
        TaskService::new(MemoryStorage::new()).with_clock(fixed_clock)
    }

    #[test]
    fn create_rejects_blank_title() {
        let mut svc = service();
        for title in ["", "   "] {
            let err = svc.create_task(TaskInput::new(title, "x")).unwrap_err();
            assert_eq!(err.user_message(), TITLE_REQUIRED_REASON);
        }
        assert!(svc.create_task(TaskInput::default()).is_err());
        assert_eq!(svc.all_tasks().unwrap().len(), 0);
    }

    #[test]
    fn create_ignores_completion_flag() {
        let mut svc = service();
        let task = svc
            .create_task(TaskInput::new("Buy milk", "").with_completed(true))
            .unwrap();
        assert!(!task.is_completed);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.created_at, fixed_clock());
    }

    #[test]
    fn update_keeps_description_when_absent() {
        let mut svc = service();
        let task = svc.create_task(TaskInput::new("a", "keep me")).unwrap();

        let input = TaskInput {
            title: Some("b".into()),
            ..TaskInput::default()
        };
        let updated = svc.update_task(&task.id, input).unwrap().unwrap();
        assert_eq!(updated.title, "b");
        assert_eq!(updated.description, "keep me");
        assert!(!updated.is_completed);
    }

    #[test]
    fn update_unknown_id_is_none() {
        let mut svc = service();
        let result = svc
            .update_task(&TaskId::generate(), TaskInput::new("x", ""))
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn complete_is_idempotent() {
        let mut svc = service();
        let task = svc.create_task(TaskInput::new("a", "")).unwrap();
        assert!(svc.complete_task(&task.id).unwrap());
        let first = svc.task(&task.id).unwrap().unwrap().completed_at;

        svc = svc.with_clock(|| Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        assert!(svc.complete_task(&task.id).unwrap());
        assert_eq!(svc.task(&task.id).unwrap().unwrap().completed_at, first);
        assert!(!svc.complete_task(&TaskId::generate()).unwrap());
    }

    #[test]
    fn delete_completed_reports_nothing_to_do() {
        let mut svc = service();
        svc.create_task(TaskInput::new("open", "")).unwrap();
        assert!(!svc.delete_completed().unwrap());
    }

    #[test]
    fn search_blank_is_validation_error() {
        let svc = service();
        assert!(matches!(
            svc.search_tasks("  "),
            Err(TaskError::Validation { .. })
        ));
    }
}
