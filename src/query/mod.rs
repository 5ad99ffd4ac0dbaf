//! Query engine: pure, stateless views over a task collection.
//!
//! The collection has no inherent order. Every read that returns a sequence
//! imposes recency order here (`created_at` descending, ties in the order
//! the collection was given, which for the bundled storages is insertion
//! order).
//!
//! Pagination assumes already-normalized positive inputs; normalization of
//! untrusted numbers lives in [`PageRequest::normalized`], which the service
//! layer calls.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::trace;

use crate::error::{Result, TaskError};
use crate::model::{DEFAULT_PAGE_SIZE, PaginatedResult, Task, TaskId};
use crate::util::time::{start_of_day, start_of_next_day};

/// Validation reason for blank search input.
pub const EMPTY_SEARCH_REASON: &str = "search term cannot be empty";

/// Conjunctive filter over completion state and creation date.
///
/// Absent fields impose no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub is_completed: Option<bool>,
    /// Inclusive, from the start of this day.
    pub start_date: Option<NaiveDate>,
    /// Inclusive through the end of this day.
    pub end_date: Option<NaiveDate>,
}

impl TaskFilter {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            is_completed: None,
            start_date: None,
            end_date: None,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_completed.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// Lower bound on `created_at` (inclusive).
    #[must_use]
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.start_date.map(start_of_day)
    }

    /// Upper bound on `created_at` (exclusive): midnight after `end_date`.
    ///
    /// A naive `<= end_date` would drop tasks created later that same day.
    #[must_use]
    pub fn created_before(&self) -> Option<DateTime<Utc>> {
        self.end_date.map(start_of_next_day)
    }

    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(completed) = self.is_completed {
            if task.is_completed != completed {
                return false;
            }
        }
        if let Some(from) = self.created_from() {
            if task.created_at < from {
                return false;
            }
        }
        if let Some(before) = self.created_before() {
            if task.created_at >= before {
                return false;
            }
        }
        true
    }
}

/// A normalized, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Build from untrusted caller input.
    ///
    /// `page_number < 1` becomes 1 and `page_size < 1` becomes the default
    /// of 10. Values beyond `u32::MAX` saturate.
    #[must_use]
    pub fn normalized(page_number: i64, page_size: i64) -> Self {
        let page_number = if page_number < 1 {
            1
        } else {
            u32::try_from(page_number).unwrap_or(u32::MAX)
        };
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            u32::try_from(page_size).unwrap_or(u32::MAX)
        };
        Self {
            page_number,
            page_size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Keep only the tasks matching `filter`, preserving the input order.
#[must_use]
pub fn filter(tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    if filter.is_empty() {
        return tasks;
    }
    tasks.into_iter().filter(|task| filter.matches(task)).collect()
}

/// Case-insensitive substring search over title and description.
///
/// Returns every match in recency order; no pagination is applied.
///
/// # Errors
///
/// Returns a validation error if `query` is empty or whitespace-only.
pub fn search(tasks: Vec<Task>, query: &str) -> Result<Vec<Task>> {
    let needle = query.trim();
    if needle.is_empty() {
        return Err(TaskError::validation("query", EMPTY_SEARCH_REASON));
    }

    let needle = needle.to_lowercase();
    let mut matches: Vec<Task> = tasks
        .into_iter()
        .filter(|task| task.matches_text(&needle))
        .collect();
    order_by_recency(&mut matches);
    Ok(matches)
}

/// Sort most-recent-first. Stable, so equal timestamps keep input order.
pub fn order_by_recency(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Order a filtered collection and cut out the requested page.
///
/// `total_count` is the size of the whole input, computed before slicing.
#[must_use]
pub fn paginate(mut tasks: Vec<Task>, request: PageRequest) -> PaginatedResult<Task> {
    order_by_recency(&mut tasks);
    let page = PaginatedResult::from_full(tasks, request.page_number, request.page_size);
    trace!(
        page_number = page.page_number,
        page_size = page.page_size,
        total_count = page.total_count,
        returned = page.data.len(),
        "paginated"
    );
    page
}

/// Filter then paginate.
#[must_use]
pub fn filter_and_paginate(
    tasks: Vec<Task>,
    task_filter: &TaskFilter,
    request: PageRequest,
) -> PaginatedResult<Task> {
    paginate(filter(tasks, task_filter), request)
}

/// IDs of every completed task, in input order.
#[must_use]
pub fn completed_ids(tasks: &[Task]) -> Vec<TaskId> {
    tasks
        .iter()
        .filter(|task| task.is_completed)
        .map(|task| task.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap()
    }

    fn task(title: &str, created_at: DateTime<Utc>) -> Task {
        Task::new(title, "", created_at)
    }

    #[test]
    fn normalization_clamps_low_values() {
        assert_eq!(PageRequest::normalized(0, 0), PageRequest::default());
        assert_eq!(
            PageRequest::normalized(-5, -1),
            PageRequest {
                page_number: 1,
                page_size: 10
            }
        );
        assert_eq!(
            PageRequest::normalized(3, 25),
            PageRequest {
                page_number: 3,
                page_size: 25
            }
        );
        assert_eq!(PageRequest::normalized(i64::MAX, 1).page_number, u32::MAX);
    }

    #[test]
    fn end_date_includes_whole_day() {
        let day = base().date_naive();
        let filter = TaskFilter {
            end_date: Some(day),
            ..TaskFilter::none()
        };
        let late_same_day = task("late", base() + Duration::seconds(86_399));
        let early_next_day = task("next", base() + Duration::seconds(86_401));
        assert!(filter.matches(&late_same_day));
        assert!(!filter.matches(&early_next_day));
    }

    #[test]
    fn start_date_is_inclusive_from_midnight() {
        let filter = TaskFilter {
            start_date: Some(base().date_naive()),
            ..TaskFilter::none()
        };
        assert!(filter.matches(&task("midnight", base())));
        assert!(!filter.matches(&task("before", base() - Duration::seconds(1))));
    }

    #[test]
    fn filters_compose_conjunctively() {
        let mut done = task("done", base());
        done.apply_completion(true, base());
        let open = task("open", base());
        let old_done = {
            let mut t = task("old", base() - Duration::days(3));
            t.apply_completion(true, base());
            t
        };

        let filter = TaskFilter {
            is_completed: Some(true),
            start_date: Some(base().date_naive()),
            end_date: None,
        };
        let kept = super::filter(vec![done.clone(), open, old_done], &filter);
        assert_eq!(kept, vec![done]);
    }

    #[test]
    fn search_rejects_blank_queries() {
        for query in ["", "   ", "\t\n"] {
            let err = search(vec![task("a", base())], query).unwrap_err();
            assert!(matches!(err, TaskError::Validation { ref reason, .. } if reason == EMPTY_SEARCH_REASON));
        }
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let mut described = task("groceries", base());
        described.description = "Pick up IMPORTANT parcel".to_string();
        let titled = task("Important call", base() + Duration::hours(1));
        let other = task("walk dog", base());

        let found = search(vec![described.clone(), titled.clone(), other], "important").unwrap();
        assert_eq!(found, vec![titled, described]);
    }

    #[test]
    fn paginate_orders_by_recency_and_counts_before_slicing() {
        let a = task("A", base());
        let b = task("B", base() + Duration::minutes(5));

        let page = paginate(
            vec![a, b.clone()],
            PageRequest {
                page_number: 1,
                page_size: 1,
            },
        );
        assert_eq!(page.data, vec![b]);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next_page);
        assert!(!page.has_previous_page);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let first = task("first", base());
        let second = task("second", base());
        let page = paginate(vec![first.clone(), second.clone()], PageRequest::default());
        assert_eq!(page.data, vec![first, second]);
    }

    #[test]
    fn completed_ids_lists_only_completed() {
        let mut done = task("done", base());
        done.apply_completion(true, base());
        let open = task("open", base());
        assert_eq!(completed_ids(&[open, done.clone()]), vec![done.id]);
    }
}
