//! Client side of the task board.
//!
//! A [`TaskStore`] drives a [`TaskBackend`] (over HTTP or in-process),
//! mirrors its [`ViewState`] into a [`Navigator`], and reports outcomes to a
//! [`Notifier`].

pub mod backend;
pub mod http;
pub mod navigation;
pub mod notify;
pub mod store;
pub mod view;

pub use backend::{FilterQuery, LocalBackend, TaskBackend};
pub use http::HttpBackend;
pub use navigation::{HistoryNavigator, NavQuery, Navigator};
pub use notify::{ConsoleNotifier, LogNotifier, Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use store::{PaginationInfo, TaskStore};
pub use view::{ViewAction, ViewState};
