//! `tb delete <id>`

use crate::cli::commands::{CommandContext, parse_task_id, print_json};
use crate::error::Result;
use crate::format::ActionOutput;

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if the id is malformed or no such task exists.
pub async fn execute(raw_id: &str, ctx: &CommandContext) -> Result<()> {
    let id = parse_task_id(raw_id)?;
    let mut store = ctx.connect()?;
    store.delete_task(&id).await?;

    let output = ActionOutput {
        action: "delete",
        id: Some(id.to_string()),
        message: format!("Deleted {id}"),
    };
    if ctx.json {
        return print_json(&output);
    }
    if ctx.quiet {
        return Ok(());
    }
    println!("{}", output.message);
    Ok(())
}
