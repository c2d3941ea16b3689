//! `passvault list`: list credentials (never their passwords).

use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, Cli};
use crate::errors::Result;
use crate::vault::SortKey;

/// Execute the `list` command.
pub fn execute(cli: &Cli, filter: Option<&str>, sort: Option<SortKey>) -> Result<()> {
    let settings = load_settings()?;
    let store = unlock_vault(cli, &settings)?;
    let repo = store.session()?.credentials();

    if repo.is_empty() {
        output::info("No credentials in this vault yet.");
        output::tip("Run `passvault add <SERVICE>` to add your first credential.");
        return Ok(());
    }

    let matches = repo.list(filter, sort);
    if matches.is_empty() {
        output::info(&format!(
            "No credentials match '{}'.",
            filter.unwrap_or_default()
        ));
        return Ok(());
    }

    output::print_credentials_table(&matches);
    output::info(&format!("{} of {} credentials shown", matches.len(), repo.len()));

    Ok(())
}
