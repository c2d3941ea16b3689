//! `passvault update`: change fields of an existing credential.

use crate::cli::output;
use crate::cli::{load_settings, read_secret_input, unlock_vault, Cli};
use crate::errors::{Result, VaultError};
use crate::generator::{self, GeneratorOptions};
use crate::vault::{CredentialId, CredentialUpdate};

/// Field changes requested on the command line.
pub struct UpdateArgs<'a> {
    pub service: Option<&'a str>,
    pub username: Option<&'a str>,
    pub url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub password: bool,
    pub generate: bool,
    pub length: Option<usize>,
}

/// Execute the `update` command.
pub fn execute(cli: &Cli, id: u64, args: &UpdateArgs<'_>) -> Result<()> {
    let settings = load_settings()?;
    let id = CredentialId(id);

    let mut update = CredentialUpdate::default();
    update.service = args.service.map(str::to_string);
    update.username = args.username.map(str::to_string);
    update.url = args.url.map(str::to_string);
    update.notes = args.notes.map(str::to_string);
    if args.generate {
        let options =
            GeneratorOptions::with_length(args.length.unwrap_or(settings.generator_length));
        update.password = Some(generator::generate(&options)?.to_string());
    } else if args.password {
        update.password = Some(read_secret_input("New password")?.to_string());
    }

    if update.is_empty() {
        return Err(VaultError::InvalidInput(
            "nothing to update — pass at least one field".into(),
        ));
    }
    let password_changed = update.password.is_some();

    let mut store = unlock_vault(cli, &settings)?;
    let repo = store.session_mut()?.credentials_mut();
    repo.update(id, update)?;
    let credential = repo.get(id)?;
    let label = format!("#{id} {}", credential.service);
    let generated = if args.generate {
        Some(zeroize::Zeroizing::new(credential.password.clone()))
    } else {
        None
    };
    store.save()?;

    crate::audit::log_audit(
        cli,
        "update",
        Some(&label),
        password_changed.then_some("password changed"),
    );

    output::success(&format!("Updated credential {label}"));
    if let Some(pw) = generated {
        output::info(&format!("Generated password: {}", pw.as_str()));
    }

    Ok(())
}
