//! Command-line surface of `tb`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::CliOverrides;
use crate::model::ActiveFilter;

pub mod commands;

/// Task board: serve the task API, or work with a running one
#[derive(Parser, Debug)]
#[command(name = "tb", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./taskboard.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the task server for client commands
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log line format (text or json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

impl Cli {
    /// Config values given as flags, for the top of the precedence chain.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            server_url: self.server_url.clone(),
            log_format: self.log_format.clone(),
            ..CliOverrides::default()
        };
        match &self.command {
            Commands::Serve(args) => {
                overrides.host.clone_from(&args.host);
                overrides.port = args.port;
                overrides.storage.clone_from(&args.storage);
                overrides.db.clone_from(&args.db);
            }
            Commands::List(args) => overrides.page_size = args.page_size,
            _ => {}
        }
        overrides
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP task server
    Serve(ServeArgs),

    /// List one page of tasks
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show task details
    Show(IdArgs),

    /// Create a new task
    #[command(alias = "create")]
    Add(AddArgs),

    /// Change a task's title or description
    Edit(EditArgs),

    /// Mark a task completed
    Done(IdArgs),

    /// Mark a task incomplete
    Reopen(IdArgs),

    /// Delete a task
    #[command(alias = "rm")]
    Delete(IdArgs),

    /// Delete every completed task
    Purge,

    /// Print the JSON Schema of the wire types
    Schema(SchemaArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Task storage (memory or sqlite)
    #[arg(long)]
    pub storage: Option<String>,

    /// `SQLite` database path (with --storage sqlite)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Tasks per page
    #[arg(long = "size", short = 'n')]
    pub page_size: Option<u32>,

    /// Completion filter
    #[arg(long, value_enum)]
    pub filter: Option<FilterArg>,

    /// Search title and description (overrides filter and dates)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only tasks created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Only tasks created on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Start from a saved view query string (e.g. "page=2&filter=completed")
    #[arg(long)]
    pub view: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    All,
    Completed,
    Incomplete,
}

impl From<FilterArg> for ActiveFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Completed => Self::Completed,
            FilterArg::Incomplete => Self::Incomplete,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    /// Task description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Task ID
    pub id: String,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Which type to describe
    #[arg(value_enum, default_value = "all")]
    pub target: SchemaTarget,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaTarget {
    Task,
    TaskInput,
    Page,
    Error,
    All,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShellType {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    #[value(name = "powershell")]
    #[value(alias = "pwsh")]
    /// `PowerShell`
    PowerShell,
    /// Elvish
    Elvish,
}
