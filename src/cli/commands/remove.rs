//! `passvault remove`: delete a credential from the vault.

use crate::cli::output;
use crate::cli::{confirm, load_settings, unlock_vault, Cli};
use crate::errors::Result;
use crate::vault::CredentialId;

/// Execute the `remove` command.
pub fn execute(cli: &Cli, id: u64, force: bool) -> Result<()> {
    let settings = load_settings()?;
    let mut store = unlock_vault(cli, &settings)?;
    let id = CredentialId(id);

    let label = {
        let credential = store.session()?.credentials().get(id)?;
        format!("#{id} {}", credential.service)
    };

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Remove credential {label}?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    store.session_mut()?.credentials_mut().remove(id)?;
    store.save()?;

    crate::audit::log_audit(cli, "remove", Some(&label), None);
    output::success(&format!("Removed credential {label}"));

    Ok(())
}
