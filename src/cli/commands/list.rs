//! `tb list`: one page of tasks, the way the store sees it.
//!
//! The view is assembled from `--view` (a saved query string) and then the
//! individual flags, pushed as the store's starting location, and loaded
//! with the same read path a browser client uses.

use crate::cli::ListArgs;
use crate::cli::commands::{CommandContext, print_json};
use crate::client::{HistoryNavigator, NavQuery, Navigator, ViewState};
use crate::error::Result;
use crate::format::{
    TaskListOutput, TextFormatOptions, format_page_footer, format_task_line_with, terminal_width,
};
use crate::model::DEFAULT_PAGE_SIZE;
use crate::util::time::parse_filter_date;

/// Execute the list command.
///
/// # Errors
///
/// Returns a validation error for malformed flags, or the fetch failure.
pub async fn execute(args: &ListArgs, ctx: &CommandContext) -> Result<()> {
    let view = build_view(args, ctx.settings.page_size)?;
    let location = NavQuery::from_view(&view).encode();
    let mut store = ctx.connect_at(HistoryNavigator::starting_at(location))?;
    store.sync_from_location().await?;

    if ctx.json {
        return print_json(&TaskListOutput {
            view: store.navigator().location(),
            tasks: store.tasks().to_vec(),
            pagination: store.pagination_info(),
        });
    }
    if ctx.quiet {
        return Ok(());
    }

    let options = TextFormatOptions {
        use_color: ctx.use_color,
        max_width: Some(terminal_width()),
    };
    for task in store.tasks() {
        println!("{}", format_task_line_with(task, options));
    }

    println!("{}", format_page_footer(&store.pagination_info()));
    if store.view().is_search_mode() {
        println!("Search: \"{}\"", store.view().search_query);
    }
    Ok(())
}

/// Resolve the requested view. Flags override `--view`, which overrides
/// the configured page size.
///
/// # Errors
///
/// Returns a validation error for a malformed `--view`, `--start` or `--end`.
pub fn build_view(args: &ListArgs, default_page_size: u32) -> Result<ViewState> {
    let mut view = match &args.view {
        Some(query) => NavQuery::parse(query)?.to_view(),
        None => ViewState {
            page_size: default_page_size,
            ..ViewState::default()
        },
    };

    if let Some(page) = args.page {
        view.current_page = page.max(1);
    }
    if let Some(size) = args.page_size {
        view.page_size = if size < 1 { DEFAULT_PAGE_SIZE } else { size };
    }
    if let Some(filter) = args.filter {
        view.active_filter = filter.into();
    }
    if let Some(search) = &args.search {
        view.search_query = search.trim().to_string();
    }
    if let Some(start) = &args.start {
        view.start_date = Some(parse_filter_date(start, "start")?);
    }
    if let Some(end) = &args.end {
        view.end_date = Some(parse_filter_date(end, "end")?);
    }
    Ok(view)
}
