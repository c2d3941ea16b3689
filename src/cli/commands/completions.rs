//! `passvault completions`: generate shell completion scripts.
//!
//! Usage:
//!   passvault completions bash > ~/.local/share/bash-completion/completions/passvault
//!   passvault completions zsh
//!   passvault completions fish

use std::io::{self, Write};

use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    write_completions(parse_shell(shell)?, &mut io::stdout())
}

fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    Ok(())
}

/// Parse a shell name, case-insensitively.  `ps` is accepted for PowerShell.
fn parse_shell(name: &str) -> Result<Shell> {
    if name.eq_ignore_ascii_case("ps") {
        return Ok(Shell::PowerShell);
    }
    Shell::from_str(name, true).map_err(|_| {
        VaultError::InvalidInput(format!(
            "unknown shell '{name}' — supported: bash, zsh, fish, powershell, elvish"
        ))
    })
}
