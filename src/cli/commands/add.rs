//! `passvault add`: store a new credential.

use crate::cli::output;
use crate::cli::{load_settings, read_secret_input, unlock_vault, Cli};
use crate::errors::Result;
use crate::generator::{self, GeneratorOptions};
use crate::vault::CredentialFields;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    service: &str,
    username: &str,
    url: Option<&str>,
    notes: Option<&str>,
    generate: bool,
    length: Option<usize>,
) -> Result<()> {
    let settings = load_settings()?;

    // Work out the password first so a bad prompt never costs a KDF run.
    let password = if generate {
        let options = GeneratorOptions::with_length(length.unwrap_or(settings.generator_length));
        generator::generate(&options)?
    } else {
        read_secret_input(&format!("Password for {service}"))?
    };

    let mut fields = CredentialFields::new(service, username, &password);
    if let Some(url) = url {
        fields = fields.with_url(url);
    }
    if let Some(notes) = notes {
        fields = fields.with_notes(notes);
    }

    let mut store = unlock_vault(cli, &settings)?;
    let session = store.session_mut()?;
    let id = session.credentials_mut().add(fields)?;
    let total = session.credentials().len();
    store.save()?;

    crate::audit::log_audit(cli, "add", Some(&format!("#{id} {service}")), None);

    output::success(&format!(
        "Credential #{id} added for '{service}' ({total} total)"
    ));
    if generate {
        output::info(&format!("Generated password: {}", password.as_str()));
    }

    Ok(())
}
