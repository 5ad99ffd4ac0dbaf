//! Error types and handling for `taskboard`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration for bootstrap glue (binding sockets, etc.)
//! - Provides recovery hints for user-facing errors
//! - Provides structured JSON output for the CLI and the HTTP boundary
//!
//! Not-found is deliberately absent from the repository and service
//! vocabulary: those layers answer with `Option`/`bool`, and only the
//! HTTP boundary (or the HTTP client) turns absence into an error.

mod structured;

pub use structured::{ErrorCode, StructuredError};

use thiserror::Error;

/// Primary error type for `taskboard` operations.
#[derive(Error, Debug)]
pub enum TaskError {
    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Task ID is not a valid identifier.
    #[error("Invalid task ID: {id}")]
    InvalidId { id: String },

    // === Task Errors ===
    /// Task with the specified ID was not found.
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },

    /// Bulk delete found nothing to remove.
    #[error("No completed tasks found")]
    NoCompletedTasks,

    // === Storage Errors ===
    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // === Transport Errors ===
    /// The backend could not be reached.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },

    // === Configuration Errors ===
    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskError {
    /// Whether different input or setup would make the call succeed.
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidId { .. }
                | Self::TaskNotFound { .. }
                | Self::NoCompletedTasks
                | Self::Config(_)
        )
    }

    /// A next step to show under the error, if there is one.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } if field == "title" => {
                Some("Provide a non-blank title")
            }
            Self::Validation { field, .. } if field == "query" => {
                Some("Provide at least one non-whitespace character to search for")
            }
            Self::TaskNotFound { .. } | Self::InvalidId { .. } => {
                Some("Run 'tb list' to see available tasks")
            }
            Self::NoCompletedTasks => Some("Mark tasks done with 'tb done <id>' first"),
            Self::Transport(_) => Some("Check that 'tb serve' is running and server-url is correct"),
            _ => None,
        }
    }

    /// Shorthand for [`TaskError::Validation`].
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The bare reason for validation failures, the display text otherwise.
    ///
    /// This is what user-facing surfaces (HTTP 400 bodies, toasts) show.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { reason, .. } => reason.clone(),
            Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type using `TaskError`.
pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TaskError::TaskNotFound {
            id: "0b7c".to_string(),
        };
        assert_eq!(err.to_string(), "Task not found: 0b7c");
    }

    #[test]
    fn test_validation_error() {
        let err = TaskError::validation("title", "title is required");
        assert_eq!(err.to_string(), "Validation failed: title: title is required");
        assert_eq!(err.user_message(), "title is required");
    }

    #[test]
    fn test_user_recoverable() {
        assert!(TaskError::NoCompletedTasks.is_user_recoverable());

        let not_recoverable = TaskError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            None,
        ));
        assert!(!not_recoverable.is_user_recoverable());
    }

    #[test]
    fn test_suggestion() {
        let err = TaskError::validation("query", "search term cannot be empty");
        assert_eq!(
            err.suggestion(),
            Some("Provide at least one non-whitespace character to search for")
        );
        assert_eq!(
            TaskError::Config("bad".into()).suggestion(),
            None,
        );
    }

    #[test]
    fn test_http_error_message() {
        let err = TaskError::Http {
            status: 404,
            message: "Failed to delete task".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to delete task (HTTP 404)");
        assert_eq!(err.user_message(), "Failed to delete task");
    }
}
