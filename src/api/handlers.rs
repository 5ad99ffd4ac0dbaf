//! HTTP handlers for `/api/tasks`.
//!
//! Handlers parse and convert at the edge, call the service under the
//! state lock, and turn `None`/`false` into 404s. Each handler takes the
//! lock once and releases it before responding.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiErrorResponse;
use crate::model::{DEFAULT_PAGE_SIZE, PaginatedResult, Task, TaskId, TaskInput};
use crate::query::TaskFilter;
use crate::util::time::parse_optional_filter_date;

/// Message returned by a successful bulk delete.
pub const COMPLETED_DELETED_MESSAGE: &str = "All completed tasks have been deleted";

const fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    i64::from(DEFAULT_PAGE_SIZE)
}

/// `pageNumber`/`pageSize` query parameters. Normalized by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

/// Query parameters for `/api/tasks/filtered`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub is_completed: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterParams {
    fn to_filter(&self) -> crate::Result<TaskFilter> {
        Ok(TaskFilter {
            is_completed: self.is_completed,
            start_date: parse_optional_filter_date(self.start_date.as_deref(), "startDate")?,
            end_date: parse_optional_filter_date(self.end_date.as_deref(), "endDate")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// Body of a successful bulk delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_id(raw: &str) -> Result<TaskId, ApiErrorResponse> {
    raw.parse::<TaskId>()
        .map_err(|_| ApiErrorResponse::task_not_found(raw))
}

/// `GET /api/tasks`
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiErrorResponse> {
    let tasks = state.service().await.all_tasks()?;
    Ok(Json(tasks))
}

/// `GET /api/tasks/paginated`
pub async fn tasks_paginated(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<PaginatedResult<Task>>, ApiErrorResponse> {
    let Query(params) = params?;
    let page = state
        .service()
        .await
        .tasks_paginated(params.page_number, params.page_size)?;
    Ok(Json(page))
}

/// `GET /api/tasks/filtered`
pub async fn tasks_filtered(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<PaginatedResult<Task>>, ApiErrorResponse> {
    let Query(params) = params?;
    let filter = params.to_filter()?;
    let page = state
        .service()
        .await
        .tasks_filtered(&filter, params.page_number, params.page_size)?;
    Ok(Json(page))
}

/// `GET /api/tasks/search?query=...`
pub async fn search_tasks(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiErrorResponse> {
    let Query(params) = params?;
    let found = state
        .service()
        .await
        .search_tasks(params.query.as_deref().unwrap_or_default())?;
    Ok(Json(found))
}

/// `GET /api/tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiErrorResponse> {
    let id = parse_id(&raw_id)?;
    state
        .service()
        .await
        .task(&id)?
        .map(Json)
        .ok_or_else(|| ApiErrorResponse::task_not_found(id))
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErrorResponse> {
    let Json(input) = body?;
    let task = state.service().await.create_task(input)?;
    let location = format!("/api/tasks/{}", task.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(task)))
}

/// `PUT /api/tasks/{id}`
pub async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> Result<Json<Task>, ApiErrorResponse> {
    let id = parse_id(&raw_id)?;
    let Json(input) = body?;
    state
        .service()
        .await
        .update_task(&id, input)?
        .map(Json)
        .ok_or_else(|| ApiErrorResponse::task_not_found(id))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    let id = parse_id(&raw_id)?;
    if state.service().await.delete_task(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiErrorResponse::task_not_found(id))
    }
}

/// `DELETE /api/tasks/completed`
pub async fn delete_completed(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiErrorResponse> {
    if state.service().await.delete_completed()? {
        Ok(Json(MessageResponse {
            message: COMPLETED_DELETED_MESSAGE.to_string(),
        }))
    } else {
        Err(crate::TaskError::NoCompletedTasks.into())
    }
}
