//! `tb show <id>`

use crate::cli::commands::{CommandContext, parse_task_id, print_json};
use crate::error::Result;
use crate::format::format_task_details;

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the id is malformed or the task cannot be fetched.
pub async fn execute(raw_id: &str, ctx: &CommandContext) -> Result<()> {
    let id = parse_task_id(raw_id)?;
    let mut store = ctx.connect()?;
    let task = store.get_task_by_id(&id).await?;

    if ctx.json {
        return print_json(&task);
    }
    if !ctx.quiet {
        print!("{}", format_task_details(&task, ctx.use_color));
    }
    Ok(())
}
