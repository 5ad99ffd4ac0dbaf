//! Output formatting for `tb`.
//!
//! Human-readable text for terminals, plus the JSON shapes printed with
//! `--json` where the wire types alone are not enough.

mod output;
mod text;

pub use output::{ActionOutput, TaskListOutput};
pub use text::{
    TextFormatOptions, format_page_footer, format_status_icon, format_status_icon_colored,
    format_task_details, format_task_line, format_task_line_with, icons, terminal_width,
    truncate_title,
};
