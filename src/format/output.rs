use serde::Serialize;

use crate::client::PaginationInfo;
use crate::model::Task;

/// `list --json`: the page, its navigation summary, and the view's
/// query string so the same view can be requested again with `--view`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListOutput {
    pub view: String,
    pub tasks: Vec<Task>,
    pub pagination: PaginationInfo,
}

/// `delete` / `purge --json` acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutput {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
}
