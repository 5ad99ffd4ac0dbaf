//! Navigable (URL query string) view state.
//!
//! A [`ViewState`] is mirrored into a query string such as
//! `page=2&pageSize=10&filter=completed&search=milk&startDate=2025-01-01`
//! so a view can be bookmarked, shared, or restored with back/forward.
//! `filter` is omitted for "all", `search` when empty, and the dates when
//! absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::view::ViewState;
use crate::error::{Result, TaskError};
use crate::model::{ActiveFilter, DEFAULT_PAGE_SIZE};
use crate::util::time::parse_filter_date;

/// Wire form of the navigable parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl NavQuery {
    /// Parse a query string (a leading `?` is allowed).
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not form-urlencoded.
    pub fn parse(query: &str) -> Result<Self> {
        let query = query.trim().trim_start_matches('?');
        serde_urlencoded::from_str(query)
            .map_err(|e| TaskError::validation("view", format!("malformed view query: {e}")))
    }

    /// Encode as a query string.
    #[must_use]
    pub fn encode(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }

    /// Mirror a view. `page` and `pageSize` are always present.
    #[must_use]
    pub fn from_view(view: &ViewState) -> Self {
        Self {
            page: Some(view.current_page.to_string()),
            page_size: Some(view.page_size.to_string()),
            filter: (view.active_filter != ActiveFilter::All)
                .then(|| view.active_filter.as_str().to_string()),
            search: (!view.search_query.is_empty()).then(|| view.search_query.clone()),
            start_date: view.start_date.map(format_date),
            end_date: view.end_date.map(format_date),
        }
    }

    /// Rebuild a view, falling back to defaults for absent or unusable values.
    #[must_use]
    pub fn to_view(&self) -> ViewState {
        ViewState {
            current_page: positive_or(self.page.as_deref(), "page", 1),
            page_size: positive_or(self.page_size.as_deref(), "pageSize", DEFAULT_PAGE_SIZE),
            active_filter: self
                .filter
                .as_deref()
                .and_then(|raw| {
                    raw.parse::<ActiveFilter>()
                        .inspect_err(|e| warn!(error = %e, "ignoring view filter"))
                        .ok()
                })
                .unwrap_or_default(),
            search_query: self.search.clone().unwrap_or_default(),
            start_date: lenient_date(self.start_date.as_deref(), "startDate"),
            end_date: lenient_date(self.end_date.as_deref(), "endDate"),
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn positive_or(raw: Option<&str>, field: &str, default: u32) -> u32 {
    match raw.map(str::trim) {
        None | Some("") => default,
        Some(value) => match value.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => {
                warn!(field, value, "ignoring invalid view parameter");
                default
            }
        },
    }
}

fn lenient_date(raw: Option<&str>, field: &str) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    parse_filter_date(raw, field)
        .inspect_err(|e| warn!(error = %e, "ignoring view date"))
        .ok()
}

/// Where navigable state is pushed to and read back from.
pub trait Navigator: Send {
    /// The current location's query string.
    fn location(&self) -> String;

    /// Record a new location.
    fn push(&mut self, query: String);

    /// Step back in history. Returns `false` at the oldest entry.
    fn back(&mut self) -> bool {
        false
    }

    /// Step forward in history. Returns `false` at the newest entry.
    fn forward(&mut self) -> bool {
        false
    }
}

/// In-memory browser-style history.
///
/// Pushing truncates forward entries. Pushing the current location again
/// is a no-op.
#[derive(Debug, Clone)]
pub struct HistoryNavigator {
    entries: Vec<String>,
    cursor: usize,
}

impl HistoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(String::new())
    }

    /// Begin at an existing location (e.g. a bookmarked view).
    #[must_use]
    pub fn starting_at(query: impl Into<String>) -> Self {
        Self {
            entries: vec![query.into()],
            cursor: 0,
        }
    }

    /// Every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for HistoryNavigator {
    fn location(&self) -> String {
        self.entries.get(self.cursor).cloned().unwrap_or_default()
    }

    fn push(&mut self, query: String) {
        if self.entries.get(self.cursor) == Some(&query) {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(query);
        self.cursor = self.entries.len() - 1;
    }

    fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }
}
