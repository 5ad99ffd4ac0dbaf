//! Navigable view state and its pure transition function.
//!
//! [`ViewState`] is "which page of which query is displayed". Every user
//! action maps to a [`ViewAction`]; [`ViewState::apply`] computes the next
//! state without side effects. Effects (URL push, fetch) belong to the
//! store.

use chrono::NaiveDate;

use crate::model::{ActiveFilter, DEFAULT_PAGE_SIZE};
use crate::query::TaskFilter;

/// Filter/search/pagination parameters held by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub current_page: u32,
    pub page_size: u32,
    pub active_filter: ActiveFilter,
    /// Non-blank text switches retrieval to search mode.
    pub search_query: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            active_filter: ActiveFilter::All,
            search_query: String::new(),
            start_date: None,
            end_date: None,
        }
    }
}

/// A request to change the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    SetPage(u32),
    SetPageSize(u32),
    SetFilter(ActiveFilter),
    SetDateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Search(String),
    ClearSearch,
    Reset,
}

impl ViewState {
    /// Whether reads go to search instead of filter+paginate.
    #[must_use]
    pub fn is_search_mode(&self) -> bool {
        !self.search_query.trim().is_empty()
    }

    /// The server-side filter this view maps to (ignored in search mode).
    #[must_use]
    pub const fn task_filter(&self) -> TaskFilter {
        TaskFilter {
            is_completed: self.active_filter.is_completed(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Compute the state after `action`.
    ///
    /// `known_total_pages` is the page count held before the action. A
    /// `SetPage` outside `1..=known_total_pages` is rejected with `None`.
    /// Every other action resets `current_page` to 1.
    #[must_use]
    pub fn apply(&self, action: ViewAction, known_total_pages: u32) -> Option<Self> {
        let mut next = self.clone();
        match action {
            ViewAction::SetPage(page) => {
                if page < 1 || page > known_total_pages {
                    return None;
                }
                next.current_page = page;
                return Some(next);
            }
            ViewAction::SetPageSize(size) => {
                next.page_size = if size < 1 { DEFAULT_PAGE_SIZE } else { size };
            }
            ViewAction::SetFilter(filter) => next.active_filter = filter,
            ViewAction::SetDateRange { start, end } => {
                next.start_date = start;
                next.end_date = end;
            }
            ViewAction::Search(query) => next.search_query = query,
            ViewAction::ClearSearch => next.search_query.clear(),
            ViewAction::Reset => next = Self {
                page_size: self.page_size,
                ..Self::default()
            },
        }
        next.current_page = 1;
        Some(next)
    }
}
