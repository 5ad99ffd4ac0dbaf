//! HTTP surface for the task service.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/api/tasks` | 200, every task |
//! | GET | `/api/tasks/paginated` | 200, one page |
//! | GET | `/api/tasks/filtered` | 200, one filtered page |
//! | GET | `/api/tasks/search` | 200, every match |
//! | GET | `/api/tasks/{id}` | 200, one task |
//! | POST | `/api/tasks` | 201 + `Location` |
//! | PUT | `/api/tasks/{id}` | 200, the updated task |
//! | DELETE | `/api/tasks/{id}` | 204 |
//! | DELETE | `/api/tasks/completed` | 200, confirmation message |

pub mod error;
pub mod handlers;

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::{delete, get};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::{Mutex, MutexGuard};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiErrorResponse};
pub use handlers::{COMPLETED_DELETED_MESSAGE, MessageResponse};

use crate::service::TaskService;
use crate::storage::DynRepository;

/// Shared application state: one service behind an async mutex.
#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<TaskService<DynRepository>>>,
}

impl AppState {
    #[must_use]
    pub fn new(service: TaskService<DynRepository>) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    /// Wrap a repository in a service with the wall clock.
    #[must_use]
    pub fn with_repository(repo: DynRepository) -> Self {
        Self::new(TaskService::new(repo))
    }

    /// Lock the service for one request.
    pub async fn service(&self) -> MutexGuard<'_, TaskService<DynRepository>> {
        self.service.lock().await
    }
}

/// Build the application router with tracing and permissive CORS.
#[must_use]
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/tasks/paginated", get(handlers::tasks_paginated))
        .route("/api/tasks/filtered", get(handlers::tasks_filtered))
        .route("/api/tasks/search", get(handlers::search_tasks))
        .route("/api/tasks/completed", delete(handlers::delete_completed))
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on http://{address}"),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
