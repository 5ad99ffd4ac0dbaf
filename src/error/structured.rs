//! Machine-readable error reports.
//!
//! One [`ErrorCode`] vocabulary serves both the CLI (`--json` error
//! envelopes and process exit codes) and the `code` field of HTTP error
//! bodies.

use crossterm::style::Stylize;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::TaskError;

/// Stable error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    DatabaseError,

    /// No task has the requested ID.
    TaskNotFound,
    /// The ID is not a UUID.
    InvalidId,
    /// Bulk delete found nothing to remove.
    NoCompletedTasks,

    ValidationFailed,

    /// The server could not be reached.
    TransportError,
    /// The server answered with an unexpected error status.
    HttpError,

    ConfigError,

    IoError,
    JsonError,
    YamlError,

    InternalError,
}

impl ErrorCode {
    /// Wire spelling, e.g. `NOT_FOUND`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::TaskNotFound => "NOT_FOUND",
            Self::InvalidId => "INVALID_ID",
            Self::NoCompletedTasks => "NO_COMPLETED_TASKS",
            Self::ValidationFailed => "VALIDATION_ERROR",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::HttpError => "HTTP_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is potentially retryable.
    ///
    /// Nothing in the system retries on its own; this flag only tells the
    /// caller whether trying again (possibly with fixed input) can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed | Self::TransportError | Self::DatabaseError
        )
    }

    /// Process exit status for `tb`.
    ///
    /// | Code | Category |
    /// |---|---|
    /// | 1 | internal |
    /// | 2 | database |
    /// | 3 | missing task / nothing to delete |
    /// | 4 | validation |
    /// | 5 | server unreachable or failing |
    /// | 7 | configuration |
    /// | 8 | I/O and parsing |
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DatabaseError => 2,
            Self::TaskNotFound | Self::InvalidId | Self::NoCompletedTasks => 3,
            Self::ValidationFailed => 4,
            Self::TransportError | Self::HttpError => 5,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
            Self::InternalError => 1,
        }
    }
}

/// A [`TaskError`] flattened for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub retryable: bool,
    /// Fields that identify what failed (task id, status, URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    #[must_use]
    pub fn from_error(err: &TaskError) -> Self {
        let (code, context) = classify(err);

        Self {
            code,
            message: err.to_string(),
            hint: err.suggestion().map(str::to_string),
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Convert to the JSON envelope printed on stderr.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// `Error: ...` plus an optional `Hint: ...` line.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let (error_label, hint_label) = if color {
            ("Error:".red().to_string(), "Hint:".yellow().to_string())
        } else {
            ("Error:".to_string(), "Hint:".to_string())
        };

        let mut output = format!("{error_label} {}", self.message);
        if let Some(hint) = &self.hint {
            output.push_str(&format!("\n{hint_label} {hint}"));
        }
        output
    }
}

fn classify(err: &TaskError) -> (ErrorCode, Option<Value>) {
    match err {
        TaskError::Validation { field, reason } => (
            ErrorCode::ValidationFailed,
            Some(json!({"field": field, "reason": reason})),
        ),
        TaskError::InvalidId { id } => (ErrorCode::InvalidId, Some(json!({"id": id}))),
        TaskError::TaskNotFound { id } => {
            (ErrorCode::TaskNotFound, Some(json!({"searched_id": id})))
        }
        TaskError::NoCompletedTasks => (ErrorCode::NoCompletedTasks, None),
        TaskError::Database(_) => (ErrorCode::DatabaseError, None),
        TaskError::Transport(source) => (
            ErrorCode::TransportError,
            source.url().map(|url| json!({"url": url.as_str()})),
        ),
        TaskError::Http { status, .. } => {
            let code = match status {
                400 => ErrorCode::ValidationFailed,
                404 => ErrorCode::TaskNotFound,
                _ => ErrorCode::HttpError,
            };
            (code, Some(json!({"status": status})))
        }
        TaskError::Config(_) => (ErrorCode::ConfigError, None),
        TaskError::Io(_) => (ErrorCode::IoError, None),
        TaskError::Json(_) => (ErrorCode::JsonError, None),
        TaskError::Yaml(_) => (ErrorCode::YamlError, None),
        TaskError::Other(_) => (ErrorCode::InternalError, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_exit_code_4() {
        let err = TaskError::validation("title", "title is required");
        let structured = StructuredError::from_error(&err);
        assert_eq!(structured.code, ErrorCode::ValidationFailed);
        assert_eq!(structured.code.exit_code(), 4);
        assert!(structured.retryable);
        assert_eq!(
            structured.context,
            Some(json!({"field": "title", "reason": "title is required"}))
        );
    }

    #[test]
    fn not_found_has_hint() {
        let err = TaskError::TaskNotFound {
            id: "abc".to_string(),
        };
        let structured = StructuredError::from_error(&err);
        assert_eq!(structured.code.as_str(), "NOT_FOUND");
        assert_eq!(
            structured.hint.as_deref(),
            Some("Run 'tb list' to see available tasks")
        );
    }

    #[test]
    fn json_envelope_shape() {
        let structured = StructuredError::from_error(&TaskError::NoCompletedTasks);
        let value = structured.to_json();
        assert_eq!(value["error"]["code"], "NO_COMPLETED_TASKS");
        assert_eq!(value["error"]["message"], "No completed tasks found");
        assert_eq!(value["error"]["retryable"], false);
    }

    #[test]
    fn http_status_keeps_task_exit_codes() {
        let missing = TaskError::Http {
            status: 404,
            message: "Task not found".into(),
        };
        assert_eq!(StructuredError::from_error(&missing).code.exit_code(), 3);

        let unavailable = TaskError::Http {
            status: 503,
            message: "Failed to fetch tasks".into(),
        };
        assert_eq!(
            StructuredError::from_error(&unavailable).code,
            ErrorCode::HttpError
        );
    }

    #[test]
    fn human_output_without_color() {
        let structured = StructuredError::from_error(&TaskError::Config("bad port".into()));
        assert_eq!(
            structured.to_human(false),
            "Error: Configuration error: bad port"
        );
    }
}
