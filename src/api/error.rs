//! API error handling.
//!
//! Every failure leaves the server as JSON `{code, message}` with the
//! matching status. Codes are the same strings the CLI prints.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, TaskError};

/// API error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// API error response containing status code and error details.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// 400 with a validation code.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::new(ErrorCode::ValidationFailed.as_str(), message),
        )
    }

    /// 404 with the given message.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ApiError::new(ErrorCode::TaskNotFound.as_str(), message),
        )
    }

    /// 404 for an unknown (or unparseable) task ID.
    #[must_use]
    pub fn task_not_found(id: impl std::fmt::Display) -> Self {
        Self::not_found(format!("Task with ID {id} not found"))
    }

    /// 500. Details stay in the server log.
    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new(
                ErrorCode::InternalError.as_str(),
                "An internal error occurred",
            ),
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<TaskError> for ApiErrorResponse {
    fn from(error: TaskError) -> Self {
        match error {
            TaskError::Validation { reason, .. } => Self::bad_request(reason),
            TaskError::InvalidId { id } | TaskError::TaskNotFound { id } => Self::task_not_found(id),
            TaskError::NoCompletedTasks => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new(ErrorCode::NoCompletedTasks.as_str(), error.to_string()),
            ),
            other => {
                tracing::error!(error = %other, "Request failed");
                Self::internal_error()
            }
        }
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
