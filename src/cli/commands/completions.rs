//! `tb completions <shell>`: print or save a completion script.
//!
//! ```bash
//! tb completions bash > ~/.local/share/bash-completion/completions/tb
//! tb completions zsh -o ~/.zsh/completions/_tb
//! ```

use std::fs::File;
use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;
use tracing::info;

use crate::cli::{Cli, CompletionsArgs, ShellType};
use crate::error::Result;

const BIN_NAME: &str = "tb";

impl From<ShellType> for Shell {
    fn from(shell: ShellType) -> Self {
        match shell {
            ShellType::Bash => Self::Bash,
            ShellType::Zsh => Self::Zsh,
            ShellType::Fish => Self::Fish,
            ShellType::PowerShell => Self::PowerShell,
            ShellType::Elvish => Self::Elvish,
        }
    }
}

fn write_script(shell: Shell, out: &mut dyn Write) {
    clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, out);
}

/// Execute the completions command.
///
/// # Errors
///
/// Returns an error if the output file cannot be created.
pub fn execute(args: &CompletionsArgs) -> Result<()> {
    let shell = Shell::from(args.shell);

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            write_script(shell, &mut file);
            info!(%shell, path = %path.display(), "Wrote completion script");
            eprintln!("Generated {shell} completions to {}", path.display());
        }
        None => write_script(shell, &mut io::stdout().lock()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut output = Vec::new();
        write_script(shell, &mut output);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn shell_types_map_to_clap_shells() {
        assert_eq!(Shell::from(ShellType::Bash), Shell::Bash);
        assert_eq!(Shell::from(ShellType::PowerShell), Shell::PowerShell);
    }

    #[test]
    fn bash_script_names_every_command() {
        let script = script(Shell::Bash);
        assert!(script.contains("_tb"));
        for command in ["serve", "list", "add", "done", "purge"] {
            assert!(script.contains(command), "missing {command}");
        }
        assert!(script.contains("--server-url"));
    }

    #[test]
    fn fish_script_targets_tb() {
        assert!(script(Shell::Fish).contains("complete -c tb"));
    }
}
