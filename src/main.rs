use std::io::{self, IsTerminal};

use clap::Parser;
use taskboard::cli::Cli;
use taskboard::cli::commands::{self, CommandContext};
use taskboard::config::{self, Settings};
use taskboard::logging::init_logging;
use taskboard::{StructuredError, TaskError};

fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => handle_error(&e, cli.json),
    };

    if let Err(e) = init_logging(cli.verbose, cli.quiet, settings.log_format) {
        eprintln!("tb: logging disabled ({e})");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => handle_error(&TaskError::Io(e), cli.json),
    };

    let ctx = CommandContext::new(settings, cli.json, cli.quiet, cli.no_color);
    if let Err(err) = runtime.block_on(commands::dispatch(&cli.command, &ctx)) {
        handle_error(&err, cli.json);
    }
}

fn load_settings(cli: &Cli) -> taskboard::Result<Settings> {
    let layer = config::load_config(cli.config.as_deref(), &cli.overrides())?;
    Settings::from_layer(&layer)
}

/// Report `err` on stderr and exit with its mapped status.
///
/// The JSON envelope is used with `--json` or when stdout is piped.
fn handle_error(err: &TaskError, json_mode: bool) -> ! {
    let report = StructuredError::from_error(err);

    if json_mode || !io::stdout().is_terminal() {
        let envelope = report.to_json();
        match serde_json::to_string_pretty(&envelope) {
            Ok(text) => eprintln!("{text}"),
            Err(_) => eprintln!("{envelope}"),
        }
    } else {
        let color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        eprintln!("{}", report.to_human(color));
    }

    std::process::exit(report.code.exit_code())
}
