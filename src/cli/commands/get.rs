//! `passvault get`: show one credential, optionally copying its password.

use std::thread;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::{CredentialId, VaultStore};

/// Execute the `get` command.
pub fn execute(cli: &Cli, id: u64, copy: bool, show: bool) -> Result<()> {
    let settings = load_settings()?;
    let store = unlock_vault(cli, &settings)?;

    let credential = store.session()?.credentials().get(CredentialId(id))?;
    output::print_credential(credential, show);

    crate::audit::log_audit(
        cli,
        "get",
        Some(&format!("#{id} {}", credential.service)),
        copy.then_some("copied to clipboard"),
    );

    if copy {
        let password = take_password(store, CredentialId(id))?;
        copy_with_timeout(&password, settings.clipboard_clear_secs)?;
    } else if !show {
        output::tip("Use --show to reveal the password or --copy to copy it.");
    }

    Ok(())
}

/// Copy one password out of the vault and lock it, so the other
/// credentials are wiped before the clipboard wait starts.
fn take_password(mut store: VaultStore, id: CredentialId) -> Result<Zeroizing<String>> {
    let password = Zeroizing::new(store.session()?.credentials().get(id)?.password.clone());
    store.lock()?;
    Ok(password)
}

/// Put `text` on the clipboard, wait `clear_after_secs`, then clear it
/// if it still holds `text`.  A zero timeout leaves the clipboard alone.
fn copy_with_timeout(text: &str, clear_after_secs: u64) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| VaultError::Clipboard(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| VaultError::Clipboard(format!("failed to copy to clipboard: {e}")))?;

    if clear_after_secs == 0 {
        output::success("Password copied to clipboard.");
        return Ok(());
    }

    output::success(&format!(
        "Password copied to clipboard. Clearing in {clear_after_secs}s..."
    ));

    // The process stays alive so the clipboard owner (on X11/Wayland) does
    // not vanish before the paste.
    thread::sleep(Duration::from_secs(clear_after_secs));

    let still_ours = clipboard
        .get_text()
        .map(|t| *Zeroizing::new(t) == text)
        .unwrap_or(false);
    if still_ours {
        clipboard
            .clear()
            .map_err(|e| VaultError::Clipboard(format!("failed to clear clipboard: {e}")))?;
        output::info("Clipboard cleared.");
    }

    Ok(())
}
