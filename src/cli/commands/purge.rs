//! `tb purge`: delete every completed task.

use crate::cli::commands::{CommandContext, print_json};
use crate::client::{HistoryNavigator, NavQuery, ViewState};
use crate::error::Result;
use crate::format::ActionOutput;
use crate::model::ActiveFilter;

/// Execute the purge command.
///
/// Loads the completed tasks first so the store knows what it is deleting;
/// with none, nothing is sent to the server.
///
/// # Errors
///
/// Returns the fetch or delete failure.
pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let view = ViewState {
        active_filter: ActiveFilter::Completed,
        page_size: ctx.settings.page_size,
        ..ViewState::default()
    };
    let location = NavQuery::from_view(&view).encode();
    let mut store = ctx.connect_at(HistoryNavigator::starting_at(location))?;
    store.sync_from_location().await?;

    let completed = store.total_count();
    if store.total_pages() > 1 {
        // Hold every completed task locally so the reported count is exact.
        store
            .set_page_size(u32::try_from(completed).unwrap_or(u32::MAX))
            .await?;
    }
    store.delete_completed_tasks().await?;

    let output = ActionOutput {
        action: "purge",
        id: None,
        message: format!("Deleted {completed} completed task(s)"),
    };
    if ctx.json {
        return print_json(&output);
    }
    if !ctx.quiet && completed > 0 {
        println!("{}", output.message);
    }
    Ok(())
}
