//! HTTP backend over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::ApiError;
use crate::client::backend::{FilterQuery, TaskBackend};
use crate::error::{Result, TaskError};
use crate::model::{PaginatedResult, Task, TaskId, TaskInput};
use crate::service::TITLE_REQUIRED_REASON;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to a running `tb serve` at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/tasks{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder, failure: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Prefer the server's explanation when it sent one.
        let detail = response
            .json::<ApiError>()
            .await
            .ok()
            .map(|body| body.message)
            .filter(|message| !message.is_empty());
        debug!(status = status.as_u16(), ?detail, "{failure}");

        let message = match detail {
            Some(detail) => format!("{failure}: {detail}"),
            None => failure.to_string(),
        };
        Err(TaskError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder, failure: &str) -> Result<T> {
        let response = self.send(request, failure).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl TaskBackend for HttpBackend {
    async fn list(&self) -> Result<Vec<Task>> {
        self.json(self.client.get(self.url("")), "Failed to fetch tasks")
            .await
    }

    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<PaginatedResult<Task>> {
        let request = self
            .client
            .get(self.url("/paginated"))
            .query(&[("pageNumber", page_number), ("pageSize", page_size)]);
        self.json(request, "Failed to fetch tasks").await
    }

    async fn fetch_filtered(&self, query: &FilterQuery) -> Result<PaginatedResult<Task>> {
        let request = self.client.get(self.url("/filtered")).query(query);
        self.json(request, "Failed to fetch filtered tasks").await
    }

    async fn search(&self, query: &str) -> Result<Vec<Task>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .client
            .get(self.url("/search"))
            .query(&[("query", query)]);
        self.json(request, "Failed to search tasks").await
    }

    async fn get(&self, id: &TaskId) -> Result<Task> {
        let request = self.client.get(self.url(&format!("/{id}")));
        self.json(request, "Task not found").await
    }

    async fn create(&self, input: &TaskInput) -> Result<Task> {
        if input.trimmed_title().is_none() {
            return Err(TaskError::validation("title", TITLE_REQUIRED_REASON));
        }
        let request = self.client.post(self.url("")).json(input);
        self.json(request, "Failed to create task").await
    }

    async fn update(&self, id: &TaskId, input: &TaskInput) -> Result<Task> {
        let request = self.client.put(self.url(&format!("/{id}"))).json(input);
        self.json(request, "Failed to update task").await
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        let request = self.client.delete(self.url(&format!("/{id}")));
        self.send(request, "Failed to delete task").await?;
        Ok(())
    }

    async fn delete_completed(&self) -> Result<()> {
        let request = self.client.delete(self.url("/completed"));
        self.send(request, "Failed to delete completed tasks").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let backend = HttpBackend::new("http://127.0.0.1:5080/").unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:5080");
        assert_eq!(
            backend.url("/search"),
            "http://127.0.0.1:5080/api/tasks/search"
        );
    }

    #[tokio::test]
    async fn blank_title_fails_before_sending() {
        // Unroutable port: any request would fail with a transport error instead.
        let backend = HttpBackend::new("http://127.0.0.1:9").unwrap();
        let err = backend.create(&TaskInput::new("  ", "")).await.unwrap_err();
        assert!(matches!(err, TaskError::Validation { .. }));
    }
}
