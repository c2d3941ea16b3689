//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::strength::{Rating, StrengthReport};
use crate::vault::Credential;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of credentials (ID, Service, Username, URL, Updated).
/// Passwords are never shown here.
pub fn print_credentials_table(credentials: &[&Credential]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Service", "Username", "URL", "Updated"]);

    for c in credentials {
        table.add_row(vec![
            c.id.to_string(),
            c.service.clone(),
            c.username.clone(),
            c.url.clone().unwrap_or_else(|| "-".to_string()),
            c.updated_at.format(TIME_FORMAT).to_string(),
        ]);
    }

    println!("{table}");
}

/// Print one credential as a two-column table.  The password is masked
/// unless `show_password` is set.
pub fn print_credential(credential: &Credential, show_password: bool) {
    let password = if show_password {
        credential.password.clone()
    } else {
        "\u{2022}".repeat(8)
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["ID".to_string(), credential.id.to_string()]);
    table.add_row(vec!["Service".to_string(), credential.service.clone()]);
    table.add_row(vec!["Username".to_string(), credential.username.clone()]);
    table.add_row(vec!["Password".to_string(), password]);
    if let Some(url) = &credential.url {
        table.add_row(vec!["URL".to_string(), url.clone()]);
    }
    if let Some(notes) = &credential.notes {
        table.add_row(vec!["Notes".to_string(), notes.clone()]);
    }
    table.add_row(vec![
        "Created".to_string(),
        credential.created_at.format(TIME_FORMAT).to_string(),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        credential.updated_at.format(TIME_FORMAT).to_string(),
    ]);

    println!("{table}");
}

/// Print a strength report with a colored rating.
pub fn print_strength(report: &StrengthReport) {
    let label = report.rating.to_string();
    let rating = match report.rating {
        Rating::VeryWeak => style(label).red().bold(),
        Rating::Weak => style(label).yellow().bold(),
        Rating::Medium => style(label).blue().bold(),
        Rating::Strong => style(label).green().bold(),
    };
    println!("Strength: {rating} ({}/100)", report.score);

    for hint in &report.feedback {
        tip(hint);
    }
}
