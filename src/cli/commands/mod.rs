//! Command implementations.
//!
//! `serve` runs the HTTP API. Every other task command is a client of a
//! running server: it drives a [`TaskStore`] over HTTP, so the command line
//! sees exactly what a browser client would.

pub mod add;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod list;
pub mod purge;
pub mod schema;
pub mod serve;
pub mod show;
pub mod status;

use std::io::{self, IsTerminal};

use serde::Serialize;

use crate::cli::Commands;
use crate::client::{
    ConsoleNotifier, HistoryNavigator, HttpBackend, LogNotifier, Notifier, TaskStore,
};
use crate::config::Settings;
use crate::error::Result;
use crate::model::TaskId;

/// Store used by client commands.
pub type RemoteStore = TaskStore<HttpBackend, HistoryNavigator, Box<dyn Notifier>>;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub settings: Settings,
    pub json: bool,
    pub quiet: bool,
    pub use_color: bool,
}

impl CommandContext {
    #[must_use]
    pub fn new(settings: Settings, json: bool, quiet: bool, no_color: bool) -> Self {
        Self {
            settings,
            json,
            quiet,
            use_color: !no_color && io::stdout().is_terminal(),
        }
    }

    /// Notices go to the console in text mode, to the log otherwise.
    /// Failures are left to the top-level error report.
    #[must_use]
    pub fn notifier(&self) -> Box<dyn Notifier> {
        if self.json || self.quiet {
            Box::new(LogNotifier)
        } else {
            let use_color = self.use_color && io::stderr().is_terminal();
            Box::new(ConsoleNotifier::new(use_color).with_errors(false))
        }
    }

    /// A store on the configured server with empty history.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(&self) -> Result<RemoteStore> {
        self.connect_at(HistoryNavigator::new())
    }

    /// A store on the configured server starting from `navigator`'s location.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect_at(&self, navigator: HistoryNavigator) -> Result<RemoteStore> {
        let backend = HttpBackend::new(&self.settings.server_url)?;
        tracing::debug!(server = backend.base_url(), "Connecting");
        Ok(TaskStore::new(backend, navigator, self.notifier()))
    }
}

/// Pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a task id given on the command line.
///
/// # Errors
///
/// Returns `InvalidId` if `raw` is not a UUID.
pub fn parse_task_id(raw: &str) -> Result<TaskId> {
    raw.trim().parse()
}

/// Run one command.
///
/// # Errors
///
/// Returns whatever the command fails with.
pub async fn dispatch(command: &Commands, ctx: &CommandContext) -> Result<()> {
    match command {
        Commands::Serve(_) => serve::execute(ctx).await,
        Commands::List(args) => list::execute(args, ctx).await,
        Commands::Show(args) => show::execute(&args.id, ctx).await,
        Commands::Add(args) => add::execute(args, ctx).await,
        Commands::Edit(args) => edit::execute(args, ctx).await,
        Commands::Done(args) => status::execute(&args.id, true, ctx).await,
        Commands::Reopen(args) => status::execute(&args.id, false, ctx).await,
        Commands::Delete(args) => delete::execute(&args.id, ctx).await,
        Commands::Purge => purge::execute(ctx).await,
        Commands::Schema(args) => schema::execute(args.target),
        Commands::Completions(args) => completions::execute(args),
    }
}
