//! Command-line interface: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{SortKey, VaultStore};

/// Environment variable holding the master password (CI/scripting).
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// Environment variable holding the new master password for `change-password`.
pub const NEW_PASSWORD_ENV: &str = "PASSVAULT_NEW_PASSWORD";

/// Minimum password length to prevent trivially weak master passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// PassVault CLI: local encrypted credential vault.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local encrypted credential vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the vault file (default: `vault_path` from .passvault.toml)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init,

    /// Add a credential (password is prompted, piped, or generated)
    Add {
        /// Service name (e.g. email, github)
        service: String,
        /// Account name for the service
        #[arg(short, long, default_value = "")]
        username: String,
        /// Login URL
        #[arg(long)]
        url: Option<String>,
        /// Free-form notes (stored encrypted)
        #[arg(long)]
        notes: Option<String>,
        /// Generate a random password instead of prompting
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password
        #[arg(long, requires = "generate")]
        length: Option<usize>,
    },

    /// Show a credential
    Get {
        /// Credential id (see `passvault list`)
        id: u64,
        /// Copy the password to the clipboard
        #[arg(short, long)]
        copy: bool,
        /// Print the password in clear text
        #[arg(short, long)]
        show: bool,
    },

    /// List credentials
    List {
        /// Only show credentials whose service, username, or URL contains this text
        #[arg(short, long)]
        filter: Option<String>,
        /// Sort by: service, username, created, updated
        #[arg(short, long)]
        sort: Option<SortKey>,
    },

    /// Change fields of a credential
    Update {
        /// Credential id
        id: u64,
        /// New service name
        #[arg(long)]
        service: Option<String>,
        /// New username
        #[arg(short, long)]
        username: Option<String>,
        /// New URL (empty string clears it)
        #[arg(long)]
        url: Option<String>,
        /// New notes (empty string clears them)
        #[arg(long)]
        notes: Option<String>,
        /// Prompt for (or read from stdin) a new password
        #[arg(short, long, conflicts_with = "generate")]
        password: bool,
        /// Replace the password with a generated one
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password
        #[arg(long, requires = "generate")]
        length: Option<usize>,
    },

    /// Remove a credential
    Remove {
        /// Credential id
        id: u64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        /// Password length (default: `generator_length` from config)
        #[arg(short, long)]
        length: Option<usize>,
        /// Exclude uppercase letters
        #[arg(long)]
        no_upper: bool,
        /// Exclude lowercase letters
        #[arg(long)]
        no_lower: bool,
        /// Exclude digits
        #[arg(long)]
        no_digits: bool,
        /// Exclude symbols
        #[arg(long)]
        no_symbols: bool,
    },

    /// Change the vault's master password
    ChangePassword,

    /// Rate the strength of a password
    Strength {
        /// Password to check (omit for a prompt or piped input)
        password: Option<String>,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.passvault.toml` from the working directory (or defaults).
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the vault file path: `--vault` wins, then the config file.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.vault {
        Some(path) => Ok(cwd.join(path)),
        None => Ok(Settings::load(&cwd)?.vault_path(&cwd)),
    }
}

/// Prompt for the master password and unlock the vault.
pub fn unlock_vault(cli: &Cli, settings: &Settings) -> Result<VaultStore> {
    let path = vault_path(cli)?;
    let mut store = VaultStore::new(&path, settings.kdf_params());
    let password = prompt_password()?;
    store.unlock(password.as_bytes())?;
    Ok(store)
}

/// Get the master password, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (CI/scripting)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// `env_var` is checked first for scripted use: `PASSVAULT_PASSWORD` for
/// `init`, `PASSVAULT_NEW_PASSWORD` for `change-password`.  Enforces a
/// minimum password length.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(env_var) {
        if pw.chars().count() < MIN_PASSWORD_LEN {
            return Err(VaultError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

/// Read a credential password from stdin when piped, or prompt for it
/// (with confirmation) on a terminal.
pub fn read_secret_input(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string());
        return Ok(trimmed);
    }

    let value = dialoguer::Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm", "Values do not match, try again")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    match std::env::var(var) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}
