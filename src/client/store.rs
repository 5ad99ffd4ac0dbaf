//! The client task store.
//!
//! Holds one page of tasks plus the [`ViewState`] that produced it, keeps
//! the view mirrored into the [`Navigator`], and reconciles the local list
//! with backend responses.
//!
//! Per-operation policy for the local list:
//!
//! | Operation | Local list after success |
//! |---|---|
//! | `create_task` | refetched (position depends on server ordering) |
//! | `update_task`, `toggle_task_completion` | entry replaced in place |
//! | `delete_task` | entry removed; steps back a page if that emptied it |
//! | `delete_completed_tasks` | refetched |
//!
//! Every operation that fails leaves the list untouched, records the
//! message in [`TaskStore::error`], raises a notice, and returns the error.
//!
//! Operations take `&mut self`, so calls on one store are sequential.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::backend::{FilterQuery, TaskBackend};
use crate::client::navigation::{NavQuery, Navigator};
use crate::client::notify::{Notice, Notifier};
use crate::client::view::{ViewAction, ViewState};
use crate::error::{Result, TaskError};
use crate::model::{ActiveFilter, PaginatedResult, Task, TaskId, TaskInput};

/// Derived navigation summary for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: usize,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Client-side state for one task list view.
pub struct TaskStore<B, N, T> {
    backend: B,
    navigator: N,
    notifier: T,
    view: ViewState,
    tasks: Vec<Task>,
    total_count: usize,
    total_pages: u32,
    loading: bool,
    error: Option<String>,
}

impl<B, N, T> TaskStore<B, N, T>
where
    B: TaskBackend,
    N: Navigator,
    T: Notifier,
{
    /// A store showing nothing yet, with the default view.
    ///
    /// Call [`sync_from_location`](Self::sync_from_location) or
    /// [`fetch_tasks`](Self::fetch_tasks) to load.
    #[must_use]
    pub fn new(backend: B, navigator: N, notifier: T) -> Self {
        Self {
            backend,
            navigator,
            notifier,
            view: ViewState::default(),
            tasks: Vec::new(),
            total_count: 0,
            total_pages: 0,
            loading: false,
            error: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The tasks on the current page, in server order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent failure, cleared when a fetch starts.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    #[must_use]
    pub const fn notifier(&self) -> &T {
        &self.notifier
    }

    #[must_use]
    pub fn pagination_info(&self) -> PaginationInfo {
        PaginationInfo {
            current_page: self.view.current_page,
            page_size: self.view.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_next_page: self.view.current_page < self.total_pages,
            has_previous_page: self.view.current_page > 1,
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Re-read the view from the navigator's location and refetch.
    ///
    /// Absent or unusable parameters fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn sync_from_location(&mut self) -> Result<()> {
        let location = self.navigator.location();
        self.view = match NavQuery::parse(&location) {
            Ok(query) => query.to_view(),
            Err(e) => {
                warn!(error = %e, location, "Unreadable location, using default view");
                ViewState::default()
            }
        };
        self.fetch_tasks().await
    }

    /// Step back in navigation history. Returns `false` at the oldest entry.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn go_back(&mut self) -> Result<bool> {
        if !self.navigator.back() {
            return Ok(false);
        }
        self.sync_from_location().await?;
        Ok(true)
    }

    /// Step forward in navigation history. Returns `false` at the newest entry.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn go_forward(&mut self) -> Result<bool> {
        if !self.navigator.forward() {
            return Ok(false);
        }
        self.sync_from_location().await?;
        Ok(true)
    }

    fn push_location(&mut self) {
        let query = NavQuery::from_view(&self.view).encode();
        debug!(%query, "Pushing view");
        self.navigator.push(query);
    }

    /// Apply a view change: update state, mirror it, but do not fetch.
    fn transition(&mut self, action: ViewAction) -> bool {
        let Some(next) = self.view.apply(action, self.total_pages) else {
            return false;
        };
        self.view = next;
        self.push_location();
        true
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Load the current view.
    ///
    /// In search mode every match is fetched and the current page is cut
    /// out locally; otherwise the server paginates. On failure the task
    /// list keeps its previous contents.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording and announcing it.
    pub async fn fetch_tasks(&mut self) -> Result<()> {
        let result = self.refresh().await;
        if let Err(err) = &result {
            self.notifier
                .notify(Notice::error("Failed to fetch tasks", err.user_message()));
        }
        result
    }

    /// Fetch without announcing failures.
    async fn refresh(&mut self) -> Result<()> {
        self.loading = true;
        self.error = None;
        let result = self.load().await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.total_count = page.total_count;
                self.total_pages = page.total_pages;
                self.tasks = page.data;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    async fn load(&self) -> Result<PaginatedResult<Task>> {
        let view = &self.view;
        if view.is_search_mode() {
            let found = self.backend.search(&view.search_query).await?;
            return Ok(PaginatedResult::from_full(
                found,
                view.current_page,
                view.page_size,
            ));
        }

        let query = FilterQuery::new(view.current_page, view.page_size, &view.task_filter());
        self.backend.fetch_filtered(&query).await
    }

    /// Fetch one task. Sets `loading` for the duration.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording and announcing it.
    pub async fn get_task_by_id(&mut self, id: &TaskId) -> Result<Task> {
        self.loading = true;
        self.error = None;
        let result = self.backend.get(id).await;
        self.loading = false;
        result.map_err(|err| self.fail("Failed to fetch task", err))
    }

    // ------------------------------------------------------------------
    // View changes
    // ------------------------------------------------------------------

    /// Go to `page`. Pages outside `1..=total_pages` (as currently known)
    /// are ignored and return `Ok(false)` without fetching.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn set_page(&mut self, page: u32) -> Result<bool> {
        if !self.transition(ViewAction::SetPage(page)) {
            debug!(page, total_pages = self.total_pages, "Ignoring out-of-range page");
            return Ok(false);
        }
        self.fetch_tasks().await?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn set_page_size(&mut self, size: u32) -> Result<()> {
        self.transition(ViewAction::SetPageSize(size));
        self.fetch_tasks().await
    }

    /// Switch the completion filter and announce it.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn set_filter(&mut self, filter: ActiveFilter) -> Result<()> {
        self.transition(ViewAction::SetFilter(filter));
        self.notifier.notify(Notice::info(
            "Filter applied",
            format!("Showing {}", filter.label()),
        ));
        self.fetch_tasks().await
    }

    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn set_date_filter(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<()> {
        self.transition(ViewAction::SetDateRange { start, end });
        self.fetch_tasks().await
    }

    /// Enter search mode for `query` and report how many tasks matched.
    ///
    /// A blank query is the same as [`Self::clear_search`] and raises no
    /// search notices.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after announcing "Search failed".
    pub async fn search_tasks(&mut self, query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return self.clear_search().await;
        }
        self.transition(ViewAction::Search(query.to_string()));
        self.notifier.notify(Notice::loading(
            "Searching tasks...",
            format!("Searching for \"{query}\""),
        ));

        let result = self.refresh().await;
        self.notifier.dismiss();
        match &result {
            Ok(()) => self.notifier.notify(Notice::success(
                "Search completed",
                format!("Found {} task(s)", self.total_count),
            )),
            Err(err) => self
                .notifier
                .notify(Notice::error("Search failed", err.user_message())),
        }
        result
    }

    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn clear_search(&mut self) -> Result<()> {
        self.transition(ViewAction::ClearSearch);
        self.fetch_tasks().await
    }

    /// Back to page 1 of all tasks with no search or dates. Keeps page size.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, if any.
    pub async fn reset_filters(&mut self) -> Result<()> {
        self.transition(ViewAction::Reset);
        self.fetch_tasks().await
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Record a failed mutation, announce it, and hand the error back.
    fn fail(&mut self, title: &str, err: TaskError) -> TaskError {
        let message = err.user_message();
        warn!(error = %err, "{title}");
        self.notifier.notify(Notice::error(title, message.clone()));
        self.error = Some(message);
        err
    }

    /// Refetch after a successful mutation. The mutation stands even if
    /// this fails; the failure is recorded and announced by the fetch.
    async fn refetch_after_mutation(&mut self) {
        if let Err(err) = self.fetch_tasks().await {
            debug!(error = %err, "Refetch after mutation failed");
        }
    }

    /// Create a task, then refetch the current view.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the local list is unchanged.
    pub async fn create_task(&mut self, input: TaskInput) -> Result<Task> {
        let task = match self.backend.create(&input).await {
            Ok(task) => task,
            Err(err) => return Err(self.fail("Failed to create task", err)),
        };
        self.notifier.notify(Notice::success(
            "Task created",
            format!("\"{}\" has been added", task.title),
        ));
        self.refetch_after_mutation().await;
        Ok(task)
    }

    fn replace_local(&mut self, task: &Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task.clone();
        }
    }

    /// Update a task and replace it in the local list.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the local list is unchanged.
    pub async fn update_task(&mut self, id: &TaskId, input: TaskInput) -> Result<Task> {
        let task = match self.backend.update(id, &input).await {
            Ok(task) => task,
            Err(err) => return Err(self.fail("Failed to update task", err)),
        };
        self.replace_local(&task);
        self.notifier.notify(Notice::success(
            "Task updated",
            format!("\"{}\" has been updated", task.title),
        ));
        Ok(task)
    }

    /// Set a task's completion flag and replace it in the local list.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the local list is unchanged.
    pub async fn toggle_task_completion(&mut self, id: &TaskId, is_completed: bool) -> Result<Task> {
        let task = match self.backend.toggle_completion(id, is_completed).await {
            Ok(task) => task,
            Err(err) => return Err(self.fail("Failed to update task", err)),
        };
        self.replace_local(&task);
        let status = if is_completed { "completed" } else { "incomplete" };
        self.notifier.notify(Notice::success(
            "Task updated",
            format!("Task marked as {status}"),
        ));
        Ok(task)
    }

    /// Delete a task and drop it from the local list.
    ///
    /// If that empties a page past the first, steps back one page.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the local list is unchanged.
    pub async fn delete_task(&mut self, id: &TaskId) -> Result<()> {
        let title = self
            .tasks
            .iter()
            .find(|t| t.id == *id)
            .map_or_else(|| id.to_string(), |t| t.title.clone());

        if let Err(err) = self.backend.delete(id).await {
            return Err(self.fail("Failed to delete task", err));
        }

        self.tasks.retain(|t| t.id != *id);
        self.notifier.notify(Notice::success(
            "Task deleted",
            format!("\"{title}\" has been deleted"),
        ));

        if self.tasks.is_empty() && self.view.current_page > 1 {
            let previous = self.view.current_page - 1;
            if let Err(err) = self.set_page(previous).await {
                debug!(error = %err, "Refetch after delete failed");
            }
        }
        Ok(())
    }

    /// Delete every completed task, then refetch.
    ///
    /// Looks only at the locally held page: with no completed task there,
    /// announces that and makes no backend call.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the local list is unchanged.
    pub async fn delete_completed_tasks(&mut self) -> Result<()> {
        let completed = self.tasks.iter().filter(|t| t.is_completed).count();
        if completed == 0 {
            self.notifier.notify(Notice::info(
                "No completed tasks",
                "There are no completed tasks to delete",
            ));
            return Ok(());
        }

        if let Err(err) = self.backend.delete_completed().await {
            return Err(self.fail("Failed to delete completed tasks", err));
        }
        self.notifier.notify(Notice::success(
            "Completed tasks deleted",
            format!("{completed} completed task(s) have been removed"),
        ));
        self.refetch_after_mutation().await;
        Ok(())
    }
}
