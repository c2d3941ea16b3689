//! `passvault strength`: rate a password without storing it.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::errors::{Result, VaultError};
use crate::strength::check_strength;

/// Execute the `strength` command.
pub fn execute(password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(p) => {
            output::warning("Password provided on command line — it may appear in shell history.");
            Zeroizing::new(p.to_string())
        }
        None if !io::stdin().is_terminal() => {
            let mut buf = Zeroizing::new(String::new());
            io::stdin().read_to_string(&mut buf)?;
            Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
        }
        None => Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Password to check")
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        ),
    };

    output::print_strength(&check_strength(&password));
    Ok(())
}
