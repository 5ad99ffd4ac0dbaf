//! Core data types for `taskboard`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Task` - The to-do record
//! - `TaskId` - Opaque identifier assigned at creation
//! - `TaskInput` - Client-supplied fields for create/update
//! - `PaginatedResult` - A page of an ordered, filtered view plus counts
//! - `ActiveFilter` - The all/completed/incomplete selector

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::TaskError;

/// Default number of items per page when the caller gives none (or < 1).
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Opaque task identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for TaskId {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| TaskError::InvalidId { id: s.to_string() })
    }
}

/// A to-do record.
///
/// Invariant: `completed_at.is_some() == is_completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Assigned at creation, never changes.
    pub id: TaskId,

    /// Non-blank after trimming.
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub is_completed: bool,

    /// Set once at creation.
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build a new, incomplete task stamped with `now`.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            description: description.into(),
            is_completed: false,
            created_at: now,
            completed_at: None,
        }
    }

    /// Apply the completion transition rule.
    ///
    /// false→true stamps `completed_at` with `now`, true→false clears it,
    /// and an unchanged flag leaves `completed_at` alone. Returns whether
    /// the flag changed.
    pub fn apply_completion(&mut self, completed: bool, now: DateTime<Utc>) -> bool {
        match (self.is_completed, completed) {
            (false, true) => {
                self.is_completed = true;
                self.completed_at = Some(now);
                true
            }
            (true, false) => {
                self.is_completed = false;
                self.completed_at = None;
                true
            }
            _ => false,
        }
    }

    /// Case-insensitive substring match against title or description.
    ///
    /// `needle_lower` must already be lowercased.
    #[must_use]
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// Fields a client supplies when creating or updating a task.
///
/// Extra fields (`id`, `createdAt`, `completedAt`) are accepted and ignored
/// so that a full `Task` body can be sent back on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Absent means "leave unchanged" on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TaskInput {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            is_completed: None,
        }
    }

    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.is_completed = Some(completed);
        self
    }

    /// The title with surrounding whitespace removed, if any remains.
    #[must_use]
    pub fn trimmed_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }
}

impl From<&Task> for TaskInput {
    fn from(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
            is_completed: Some(task.is_completed),
        }
    }
}

/// A bounded slice of an ordered, filtered collection plus count metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    /// Size of the whole filtered set, not just this page.
    pub total_count: usize,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PaginatedResult<T> {
    /// Assemble a page and derive the navigation fields.
    #[must_use]
    pub fn new(data: Vec<T>, page_number: u32, page_size: u32, total_count: usize) -> Self {
        let total_pages = total_pages(total_count, page_size);
        Self {
            data,
            page_number,
            page_size,
            total_count,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
        }
    }

    /// Cut the `page_number` window out of an already-ordered full sequence.
    ///
    /// Pages past the end produce empty `data` with correct counts.
    #[must_use]
    pub fn from_full(items: Vec<T>, page_number: u32, page_size: u32) -> Self {
        let total_count = items.len();
        let skip = page_offset(page_number, page_size);
        let data = items
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();
        Self::new(data, page_number, page_size, total_count)
    }
}

/// `ceil(total_count / page_size)`; zero when `page_size` is zero.
#[must_use]
pub fn total_pages(total_count: usize, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(page_size as usize);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Number of items preceding `page_number` (1-based).
#[must_use]
pub fn page_offset(page_number: u32, page_size: u32) -> usize {
    (page_number.saturating_sub(1) as usize).saturating_mul(page_size as usize)
}

/// Mutually exclusive completion filter held by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl ActiveFilter {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
        }
    }

    /// The `isCompleted` query value this filter maps to.
    #[must_use]
    pub const fn is_completed(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Completed => Some(true),
            Self::Incomplete => Some(false),
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All tasks",
            Self::Completed => "Completed tasks",
            Self::Incomplete => "Incomplete tasks",
        }
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActiveFilter {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "incomplete" | "open" | "pending" => Ok(Self::Incomplete),
            other => Err(TaskError::validation(
                "filter",
                format!("unknown filter '{other}' (use all, completed, incomplete)"),
            )),
        }
    }
}
