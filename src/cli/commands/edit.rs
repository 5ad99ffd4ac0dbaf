//! `tb edit <id> [--title T] [--description D]`

use crate::cli::EditArgs;
use crate::cli::commands::{CommandContext, parse_task_id, print_json};
use crate::error::{Result, TaskError};
use crate::format::format_task_line;
use crate::model::TaskInput;

/// Execute the edit command.
///
/// Fields not given keep their current values.
///
/// # Errors
///
/// Returns a validation error when nothing would change or the new title is
/// blank, or the server's failure.
pub async fn execute(args: &EditArgs, ctx: &CommandContext) -> Result<()> {
    if args.title.is_none() && args.description.is_none() {
        return Err(TaskError::validation(
            "title",
            "nothing to change (pass --title and/or --description)",
        ));
    }

    let id = parse_task_id(&args.id)?;
    let mut store = ctx.connect()?;
    let current = store.get_task_by_id(&id).await?;

    let mut input = TaskInput::from(&current);
    if let Some(title) = &args.title {
        input.title = Some(title.clone());
    }
    if let Some(description) = &args.description {
        input.description = Some(description.clone());
    }
    let task = store.update_task(&id, input).await?;

    if ctx.json {
        return print_json(&task);
    }
    if !ctx.quiet {
        println!("{}", format_task_line(&task));
    }
    Ok(())
}
