//! `passvault change-password`: change the vault master password.
//!
//! Unlocks with the current password, derives a new key under a fresh
//! salt, and rewrites the vault atomically.  If anything fails the file on
//! disk still opens with the old password.

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, unlock_vault, Cli, NEW_PASSWORD_ENV};
use crate::errors::Result;

/// Execute the `change-password` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;

    // 1. Open the vault with the current password.
    output::info("Enter your current master password.");
    let mut store = unlock_vault(cli, &settings)?;

    // 2. Prompt for the new password.
    output::info("Choose your new master password.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;

    // 3. Re-key and save.
    store.change_master_password(new_password.as_bytes())?;
    let count = store.session()?.credentials().len();

    crate::audit::log_audit(
        cli,
        "change-password",
        None,
        Some(&format!("{count} credentials re-encrypted")),
    );

    output::success(&format!(
        "Master password changed ({count} credentials re-encrypted)"
    ));

    Ok(())
}
