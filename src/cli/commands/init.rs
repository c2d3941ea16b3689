//! `passvault init`: create a new, empty vault.

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, vault_path, Cli, PASSWORD_ENV};
use crate::errors::{Result, VaultError};
use crate::vault::{format, VaultStore};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli)?;

    // 1. Fail early, before prompting, if a vault is already there.
    if format::vault_exists(&path) {
        output::tip("Use `passvault add <SERVICE>` to add credentials to the existing vault.");
        return Err(VaultError::AlreadyExists(path));
    }

    // 2. Prompt for a new master password (with confirmation).
    let password = prompt_new_password(PASSWORD_ENV)?;

    // 3. Create the vault file.  `create` re-checks existence under the lock.
    let mut store = VaultStore::new(&path, settings.kdf_params());
    store.create(password.as_bytes())?;
    store.lock()?;

    crate::audit::log_audit(cli, "init", None, Some("vault created"));

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `passvault add <SERVICE>` to store a credential.");
    output::tip("Run `passvault generate` to create a strong password.");

    Ok(())
}
