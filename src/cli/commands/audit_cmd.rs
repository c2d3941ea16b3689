//! `passvault audit`: display the audit log.
//!
//! Usage:
//!   passvault audit               # show last 50 entries
//!   passvault audit --last 20     # show last 20
//!   passvault audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Duration, Utc};

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use crate::audit::{audit_dir, AuditLog};
    use crate::cli::{output, vault_path};

    let since = since.map(parse_since).transpose()?;

    let dir = audit_dir(&vault_path(cli)?);
    let audit = AuditLog::open(&dir)
        .ok_or_else(|| VaultError::Audit("failed to open audit database".into()))?;

    let entries = audit.query(last, since)?;
    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);
    Ok(())
}

/// Without the `audit-log` feature there is nothing to show.
#[cfg(not(feature = "audit-log"))]
pub fn execute(_cli: &Cli, _last: usize, since: Option<&str>) -> Result<()> {
    since.map(parse_since).transpose()?;
    Err(VaultError::Audit(
        "this build was compiled without the `audit-log` feature".into(),
    ))
}

/// Turn "7d", "24h", "30m", or "2w" into the instant that long ago.
fn parse_since(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        VaultError::InvalidInput(format!(
            "invalid duration '{input}' — use a number followed by w, d, h, or m (e.g. 7d)"
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if amount < 0 {
        return Err(invalid());
    }

    let span = match unit {
        'w' => Duration::try_weeks(amount),
        'd' => Duration::try_days(amount),
        'h' => Duration::try_hours(amount),
        'm' => Duration::try_minutes(amount),
        _ => None,
    }
    .ok_or_else(invalid)?;

    Utc::now().checked_sub_signed(span).ok_or_else(invalid)
}

#[cfg(feature = "audit-log")]
fn print_audit_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Credential", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.credential.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

#[cfg(feature = "audit-log")]
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" | "add" => style(op).green().to_string(),
        "update" => style(op).blue().to_string(),
        "remove" => style(op).red().to_string(),
        "change-password" => style(op).yellow().to_string(),
        "get" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_since_units() {
        let cases = [("7d", 7 * 24 * 60), ("24h", 24 * 60), ("30m", 30), ("2w", 14 * 24 * 60)];
        for (input, minutes) in cases {
            let ago = Utc::now() - parse_since(input).unwrap();
            assert!((ago.num_minutes() - minutes).abs() <= 1, "{input}");
        }
    }

    #[test]
    fn parse_since_rejects_garbage() {
        for bad in ["", "abc", "7x", "d", "-3d", "99999999999999w"] {
            assert!(
                matches!(parse_since(bad), Err(VaultError::InvalidInput(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[cfg(feature = "audit-log")]
    #[test]
    fn colorize_operation_keeps_the_name() {
        console::set_colors_enabled(false);
        assert_eq!(colorize_operation("add"), "add");
        assert_eq!(colorize_operation("unknown"), "unknown");
    }
}
