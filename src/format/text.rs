//! Text formatting for terminal output.
//!
//! - Completion icons (○ ✓)
//! - Task lines and detail blocks
//! - Page footers

use crossterm::style::Stylize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::client::PaginationInfo;
use crate::model::Task;

/// Completion icon characters.
pub mod icons {
    /// Still to do (hollow circle).
    pub const OPEN: &str = "○";
    /// Completed (checkmark).
    pub const DONE: &str = "✓";
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

#[must_use]
pub const fn format_status_icon(task: &Task) -> &'static str {
    if task.is_completed {
        icons::DONE
    } else {
        icons::OPEN
    }
}

/// Format the completion icon with optional color.
#[must_use]
pub fn format_status_icon_colored(task: &Task, use_color: bool) -> String {
    let icon = format_status_icon(task);
    if !use_color {
        return icon.to_string();
    }
    if task.is_completed {
        icon.green().to_string()
    } else {
        icon.yellow().to_string()
    }
}

/// Determine terminal width from environment (falls back to 80).
#[must_use]
pub fn terminal_width() -> usize {
    if let Ok(columns) = std::env::var("COLUMNS") {
        if let Ok(value) = columns.trim().parse::<usize>() {
            if value > 0 {
                return value;
            }
        }
    }
    80
}

/// Truncate a title to fit within `max_len` visible columns.
///
/// Handles wide characters (emojis, CJK) correctly using `unicode-width`.
#[must_use]
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if UnicodeWidthStr::width(title) <= max_len {
        return title.to_string();
    }
    if max_len <= 3 {
        return take_columns(title, max_len);
    }
    let mut truncated = take_columns(title, max_len - 3);
    truncated.push_str("...");
    truncated
}

fn take_columns(text: &str, columns: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let width = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + width > columns {
            break;
        }
        used += width;
        out.push(c);
    }
    out
}

/// Format a single-line task summary with options.
///
/// Format: `{icon} {id} {title}`
#[must_use]
pub fn format_task_line_with(task: &Task, options: TextFormatOptions) -> String {
    let id = task.id.to_string();
    let prefix_len = UnicodeWidthStr::width(format_status_icon(task)) + 1 + id.len() + 1;

    let title = options.max_width.map_or_else(
        || task.title.clone(),
        |width| truncate_title(&task.title, width.saturating_sub(prefix_len)),
    );
    let icon = format_status_icon_colored(task, options.use_color);

    if options.use_color {
        format!("{icon} {} {title}", id.dark_grey())
    } else {
        format!("{icon} {id} {title}")
    }
}

/// Format a single-line task summary without color or truncation.
#[must_use]
pub fn format_task_line(task: &Task) -> String {
    format_task_line_with(task, TextFormatOptions::plain())
}

/// Multi-line detail view for `show`.
#[must_use]
pub fn format_task_details(task: &Task, use_color: bool) -> String {
    let icon = format_status_icon_colored(task, use_color);
    let title = if use_color {
        task.title.clone().bold().to_string()
    } else {
        task.title.clone()
    };

    let mut out = format!("{icon} {title}\n");
    out.push_str(&format!("  ID:        {}\n", task.id));
    out.push_str(&format!(
        "  Status:    {}\n",
        if task.is_completed { "completed" } else { "incomplete" }
    ));
    out.push_str(&format!(
        "  Created:   {}\n",
        task.created_at.format(DATE_FORMAT)
    ));
    if let Some(completed_at) = task.completed_at {
        out.push_str(&format!(
            "  Completed: {}\n",
            completed_at.format(DATE_FORMAT)
        ));
    }
    if !task.description.trim().is_empty() {
        out.push('\n');
        for line in task.description.lines() {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out
}

/// `Page 2 of 5 (43 tasks)`, or `No tasks` for an empty set.
#[must_use]
pub fn format_page_footer(info: &PaginationInfo) -> String {
    if info.total_count == 0 {
        return "No tasks".to_string();
    }
    let noun = if info.total_count == 1 { "task" } else { "tasks" };
    format!(
        "Page {} of {} ({} {noun})",
        info.current_page, info.total_pages, info.total_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_test_task() -> Task {
        let created = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        Task::new("Test title", "first line\nsecond line", created)
    }

    #[test]
    fn test_status_icons() {
        let mut task = make_test_task();
        assert_eq!(format_status_icon(&task), "○");
        task.apply_completion(true, Utc::now());
        assert_eq!(format_status_icon(&task), "✓");
    }

    #[test]
    fn test_format_task_line() {
        let task = make_test_task();
        assert_eq!(
            format_task_line(&task),
            format!("○ {} Test title", task.id)
        );
    }

    #[test]
    fn test_truncate_title_adds_ellipsis() {
        assert_eq!(truncate_title("This is a long title", 10), "This is...");
        assert_eq!(truncate_title("short", 10), "short");
        assert_eq!(truncate_title("wide", 2), "wi");
        assert_eq!(truncate_title("日本語のタイトル", 7), "日本...");
    }

    #[test]
    fn test_format_task_line_with_truncation() {
        let mut task = make_test_task();
        task.title = "A very long task title that will not fit".to_string();
        let options = TextFormatOptions {
            use_color: false,
            max_width: Some(50),
        };
        let line = format_task_line_with(&task, options);
        assert!(line.ends_with("..."));
        assert!(UnicodeWidthStr::width(line.as_str()) <= 50);
    }

    #[test]
    fn test_details_include_description() {
        let details = format_task_details(&make_test_task(), false);
        assert!(details.contains("Status:    incomplete"));
        assert!(details.contains("Created:   2025-03-14 09:30"));
        assert!(details.contains("  second line\n"));
        assert!(!details.contains("Completed:"));
    }

    #[test]
    fn test_page_footer() {
        let mut info = PaginationInfo {
            current_page: 1,
            page_size: 10,
            total_count: 0,
            total_pages: 0,
            has_next_page: false,
            has_previous_page: false,
        };
        assert_eq!(format_page_footer(&info), "No tasks");

        info.current_page = 2;
        info.total_count = 43;
        info.total_pages = 5;
        assert_eq!(format_page_footer(&info), "Page 2 of 5 (43 tasks)");
    }
}
