#![allow(dead_code)]

use std::sync::Once;
use std::time::Instant;

use taskboard::api::{self, AppState};
use taskboard::model::Task;
use taskboard::service::TaskService;
use taskboard::storage::{DynRepository, MemoryStorage};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

pub mod cli;
pub mod fixtures;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        taskboard::logging::init_test_logging();
    });
}

pub struct TestLogGuard {
    name: String,
    start: Instant,
}

impl TestLogGuard {
    fn new(name: &str) -> Self {
        init_test_logging();
        info!("{name}: starting");
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for TestLogGuard {
    fn drop(&mut self) {
        info!(
            "{}: assertions passed (elapsed {:?})",
            self.name,
            self.start.elapsed()
        );
    }
}

pub fn test_log(name: &str) -> TestLogGuard {
    TestLogGuard::new(name)
}

pub fn memory_service() -> TaskService<MemoryStorage> {
    init_test_logging();
    TaskService::new(MemoryStorage::new())
}

/// Shared state over an in-memory store already holding `tasks`.
pub fn seeded_state(tasks: impl IntoIterator<Item = Task>) -> AppState {
    init_test_logging();
    let storage = MemoryStorage::with_tasks(tasks).expect("seed tasks");
    let repo: DynRepository = Box::new(storage);
    AppState::with_repository(repo)
}

/// A server on an ephemeral local port, stopped on drop.
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start(state: AppState) -> Self {
        init_test_logging();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let server_state = state.clone();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            api::serve(listener, server_state, shutdown)
                .await
                .expect("server");
        });

        Self {
            base_url: format!("http://{address}"),
            state,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.await.expect("server task");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
