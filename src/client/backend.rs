//! The store's view of the server.
//!
//! [`TaskBackend`] mirrors the HTTP surface. [`HttpBackend`](super::HttpBackend)
//! talks to a running server; [`LocalBackend`] calls a service in-process.
//! Unlike the service, a backend reports absence as an error: the store
//! treats every unsuccessful call the same way.

use async_trait::async_trait;
use serde::Serialize;

use crate::api::AppState;
use crate::error::{Result, TaskError};
use crate::model::{PaginatedResult, Task, TaskId, TaskInput};
use crate::query::TaskFilter;
use crate::util::time::parse_optional_filter_date;

/// Parameters of a filtered page request, in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl FilterQuery {
    #[must_use]
    pub fn new(page_number: u32, page_size: u32, filter: &TaskFilter) -> Self {
        Self {
            page_number,
            page_size,
            is_completed: filter.is_completed,
            start_date: filter.start_date.map(|d| d.format("%Y-%m-%d").to_string()),
            end_date: filter.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Back to a typed filter.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed dates.
    pub fn task_filter(&self) -> Result<TaskFilter> {
        Ok(TaskFilter {
            is_completed: self.is_completed,
            start_date: parse_optional_filter_date(self.start_date.as_deref(), "startDate")?,
            end_date: parse_optional_filter_date(self.end_date.as_deref(), "endDate")?,
        })
    }
}

/// Remote task operations used by the client store.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Every task, most recent first.
    async fn list(&self) -> Result<Vec<Task>>;

    /// One unfiltered page.
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<PaginatedResult<Task>>;

    /// One filtered page.
    async fn fetch_filtered(&self, query: &FilterQuery) -> Result<PaginatedResult<Task>>;

    /// Every match for `query`. A blank query yields no results.
    async fn search(&self, query: &str) -> Result<Vec<Task>>;

    async fn get(&self, id: &TaskId) -> Result<Task>;

    async fn create(&self, input: &TaskInput) -> Result<Task>;

    async fn update(&self, id: &TaskId, input: &TaskInput) -> Result<Task>;

    async fn delete(&self, id: &TaskId) -> Result<()>;

    /// Bulk-delete completed tasks. Fails when there were none.
    async fn delete_completed(&self) -> Result<()>;

    /// Read the current record, then write it back with a new completion flag.
    async fn toggle_completion(&self, id: &TaskId, is_completed: bool) -> Result<Task> {
        let current = self.get(id).await?;
        let input = TaskInput::from(&current).with_completed(is_completed);
        self.update(id, &input).await
    }
}

/// In-process backend over the same state the HTTP router serves.
#[derive(Clone)]
pub struct LocalBackend {
    state: AppState,
}

impl LocalBackend {
    #[must_use]
    pub const fn new(state: AppState) -> Self {
        Self { state }
    }
}

fn not_found(id: &TaskId) -> TaskError {
    TaskError::TaskNotFound { id: id.to_string() }
}

#[async_trait]
impl TaskBackend for LocalBackend {
    async fn list(&self) -> Result<Vec<Task>> {
        self.state.service().await.all_tasks()
    }

    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<PaginatedResult<Task>> {
        self.state
            .service()
            .await
            .tasks_paginated(i64::from(page_number), i64::from(page_size))
    }

    async fn fetch_filtered(&self, query: &FilterQuery) -> Result<PaginatedResult<Task>> {
        let filter = query.task_filter()?;
        self.state.service().await.tasks_filtered(
            &filter,
            i64::from(query.page_number),
            i64::from(query.page_size),
        )
    }

    async fn search(&self, query: &str) -> Result<Vec<Task>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.state.service().await.search_tasks(query)
    }

    async fn get(&self, id: &TaskId) -> Result<Task> {
        self.state
            .service()
            .await
            .task(id)?
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, input: &TaskInput) -> Result<Task> {
        self.state.service().await.create_task(input.clone())
    }

    async fn update(&self, id: &TaskId, input: &TaskInput) -> Result<Task> {
        self.state
            .service()
            .await
            .update_task(id, input.clone())?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        if self.state.service().await.delete_task(id)? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    async fn delete_completed(&self) -> Result<()> {
        if self.state.service().await.delete_completed()? {
            Ok(())
        } else {
            Err(TaskError::NoCompletedTasks)
        }
    }
}
