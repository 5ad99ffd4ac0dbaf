//! User-facing notifications (toasts).
//!
//! The store raises a [`Notice`] for every outcome a user should see.
//! Presentation is up to the [`Notifier`].

use std::fmt;

use crossterm::style::Stylize;

/// Severity/kind of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
    /// A pending operation; replaced by the next notice after `dismiss`.
    Loading,
}

impl NoticeLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Loading => "loading",
        }
    }
}

/// A single toast: a short title plus a description line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    #[must_use]
    pub fn new(level: NoticeLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, description)
    }

    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, description)
    }

    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, description)
    }

    #[must_use]
    pub fn loading(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Loading, title, description)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.description)
        }
    }
}

/// Sink for notices.
pub trait Notifier: Send {
    fn notify(&mut self, notice: Notice);

    /// Clear any pending (loading) notice.
    fn dismiss(&mut self) {}
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice);
    }

    fn dismiss(&mut self) {
        (**self).dismiss();
    }
}

/// Routes notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(title = %notice.title, "{}", notice.description),
            NoticeLevel::Loading => tracing::debug!(title = %notice.title, "{}", notice.description),
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(title = %notice.title, "{}", notice.description);
            }
        }
    }
}

/// Prints notices to stderr, one line each.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    use_color: bool,
    show_loading: bool,
    show_errors: bool,
}

impl ConsoleNotifier {
    #[must_use]
    pub const fn new(use_color: bool) -> Self {
        Self {
            use_color,
            show_loading: false,
            show_errors: true,
        }
    }

    /// Also print loading notices (hidden by default).
    #[must_use]
    pub const fn with_loading(mut self, show: bool) -> Self {
        self.show_loading = show;
        self
    }

    /// Print error notices (shown by default). Turn off when the caller
    /// reports the returned error itself.
    #[must_use]
    pub const fn with_errors(mut self, show: bool) -> Self {
        self.show_errors = show;
        self
    }

    fn render(&self, notice: &Notice) -> String {
        let marker = match notice.level {
            NoticeLevel::Info => "i",
            NoticeLevel::Success => "✓",
            NoticeLevel::Error => "✗",
            NoticeLevel::Loading => "…",
        };
        if !self.use_color {
            return format!("{marker} {notice}");
        }
        let marker = match notice.level {
            NoticeLevel::Info => marker.cyan().to_string(),
            NoticeLevel::Success => marker.green().to_string(),
            NoticeLevel::Error => marker.red().to_string(),
            NoticeLevel::Loading => marker.dim().to_string(),
        };
        if notice.description.is_empty() {
            format!("{marker} {}", notice.title.as_str().bold())
        } else {
            format!("{marker} {}: {}", notice.title.as_str().bold(), notice.description)
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: Notice) {
        let hidden = match notice.level {
            NoticeLevel::Loading => !self.show_loading,
            NoticeLevel::Error => !self.show_errors,
            NoticeLevel::Info | NoticeLevel::Success => false,
        };
        if hidden {
            return;
        }
        eprintln!("{}", self.render(&notice));
    }
}

/// Keeps every notice in memory; useful for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub notices: Vec<Notice>,
    pub dismissals: usize,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Titles in the order they were raised.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.notices.iter().map(|n| n.title.as_str()).collect()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn dismiss(&mut self) {
        self.dismissals += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering() {
        let console = ConsoleNotifier::new(false);
        assert_eq!(
            console.render(&Notice::success("Task created", "\"Milk\" has been added")),
            "✓ Task created: \"Milk\" has been added"
        );
        assert_eq!(console.render(&Notice::info("Done", "")), "i Done");
    }

    #[test]
    fn recording_notifier_tracks_dismissals() {
        let mut recorder = RecordingNotifier::new();
        recorder.notify(Notice::loading("Searching tasks...", ""));
        recorder.dismiss();
        recorder.notify(Notice::success("Search completed", "Found 1 task(s)"));
        assert_eq!(recorder.titles(), ["Searching tasks...", "Search completed"]);
        assert_eq!(recorder.dismissals, 1);
    }
}
