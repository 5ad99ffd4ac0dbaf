//! `taskboard`: a task (to-do) tracker with an HTTP backend and a
//! URL-driven client store.
//!
//! Layers, leaf first:
//! - [`model`]: the `Task` record and wire types
//! - [`query`]: pure filter/search/paginate views
//! - [`storage`]: the repository capability and its backends
//! - [`service`]: validation and business rules
//! - [`api`]: the axum HTTP surface
//! - [`client`]: backends, navigable view state, and the `TaskStore`

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod query;
pub mod service;
pub mod storage;
pub mod util;

pub use error::{ErrorCode, Result, StructuredError, TaskError};
