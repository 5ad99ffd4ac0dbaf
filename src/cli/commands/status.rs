//! `tb done <id>` and `tb reopen <id>`

use crate::cli::commands::{CommandContext, parse_task_id, print_json};
use crate::error::Result;
use crate::format::format_task_line;

/// Set a task's completion flag.
///
/// # Errors
///
/// Returns an error if the id is malformed or the server rejects the update.
pub async fn execute(raw_id: &str, completed: bool, ctx: &CommandContext) -> Result<()> {
    let id = parse_task_id(raw_id)?;
    let mut store = ctx.connect()?;
    let task = store.toggle_task_completion(&id, completed).await?;

    if ctx.json {
        return print_json(&task);
    }
    if !ctx.quiet {
        println!("{}", format_task_line(&task));
    }
    Ok(())
}
