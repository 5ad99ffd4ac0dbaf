//! `tb add <title> [-d description]`

use crate::cli::AddArgs;
use crate::cli::commands::{CommandContext, print_json};
use crate::error::Result;
use crate::format::format_task_line;
use crate::model::TaskInput;

/// Execute the add command.
///
/// # Errors
///
/// Returns a validation error for a blank title, or the server's failure.
pub async fn execute(args: &AddArgs, ctx: &CommandContext) -> Result<()> {
    let mut store = ctx.connect()?;
    let task = store
        .create_task(TaskInput::new(args.title.as_str(), args.description.as_str()))
        .await?;

    if ctx.json {
        return print_json(&task);
    }
    if ctx.quiet {
        println!("{}", task.id);
    } else {
        println!("{}", format_task_line(&task));
    }
    Ok(())
}
