//! Audit log: SQLite-based operation history.
//!
//! Stores a record of every vault operation (init, add, remove, etc.)
//! in a local SQLite database at `<vault dir>/audit.db`.  Entries name
//! the vault and the credential id/service involved; passwords, notes,
//! and usernames are never written.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.  Building
//! without the `audit-log` feature turns logging into a no-op.

use std::path::{Path, PathBuf};

use crate::cli::Cli;

#[cfg(feature = "audit-log")]
use chrono::{DateTime, Utc};
#[cfg(feature = "audit-log")]
use rusqlite::Connection;

#[cfg(feature = "audit-log")]
use crate::errors::{Result, VaultError};

/// File name of the audit database, next to the vault file.
pub const DB_FILE_NAME: &str = "audit.db";

/// A single audit log entry.
#[cfg(feature = "audit-log")]
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub vault: String,
    pub credential: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
#[cfg(feature = "audit-log")]
pub struct AuditLog {
    conn: Connection,
}

#[cfg(feature = "audit-log")]
impl AuditLog {
    /// Open (or create) the audit database at `<dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened; callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(dir);
        let conn = match Connection::open(&db_path) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::debug!(path = %db_path.display(), error = %e, "audit log unavailable");
                return None;
            }
        };

        // Owner-only access.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                vault       TEXT NOT NULL,
                credential  TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget: errors are silently ignored.
    pub fn log(
        &self,
        operation: &str,
        vault: &str,
        credential: Option<&str>,
        details: Option<&str>,
    ) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, vault, credential, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, vault, credential, details],
        );
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let (sql, params): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match since {
            Some(ref ts) => (
                "SELECT id, timestamp, operation, vault, credential, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
                vec![
                    Box::new(ts.to_rfc3339()) as Box<dyn rusqlite::types::ToSql>,
                    Box::new(limit_i64),
                ],
            ),
            None => (
                "SELECT id, timestamp, operation, vault, credential, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
                vec![Box::new(limit_i64) as Box<dyn rusqlite::types::ToSql>],
            ),
        };

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| VaultError::Audit(format!("query prepare: {e}")))?;

        let params_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| &**p).collect();

        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    vault: row.get(3)?,
                    credential: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| VaultError::Audit(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| VaultError::Audit(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Path of the audit database inside `dir`.
    pub fn db_path(dir: &Path) -> PathBuf {
        dir.join(DB_FILE_NAME)
    }
}

/// Directory holding the audit database for a given vault file.
pub fn audit_dir(vault_path: &Path) -> PathBuf {
    match vault_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Convenience helper: log an audit event using the CLI context.
///
/// Opens the audit database next to the vault, logs the event, and
/// silently ignores any errors.  It never fails the parent operation.
#[cfg(feature = "audit-log")]
pub fn log_audit(cli: &Cli, op: &str, credential: Option<&str>, details: Option<&str>) {
    let Ok(vault_path) = crate::cli::vault_path(cli) else {
        return;
    };

    if let Some(audit) = AuditLog::open(&audit_dir(&vault_path)) {
        audit.log(op, &vault_path.display().to_string(), credential, details);
    }
}

/// Audit logging is compiled out; nothing is recorded.
#[cfg(not(feature = "audit-log"))]
pub fn log_audit(_cli: &Cli, _op: &str, _credential: Option<&str>, _details: Option<&str>) {}

#[cfg(all(test, feature = "audit-log"))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path());
        assert!(audit.is_some(), "should open successfully");
        assert!(dir.path().join("audit.db").exists());
    }

    #[test]
    fn log_and_query_roundtrip() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("add", "main.vault", Some("#0 email"), None);
        audit.log("add", "main.vault", Some("#1 bank"), None);
        audit.log("remove", "main.vault", Some("#0 email"), None);

        let entries = audit.query(10, None).unwrap();
        assert_eq!(entries.len(), 3);

        // Most recent first.
        assert_eq!(entries[0].operation, "remove");
        assert_eq!(entries[1].operation, "add");
        assert_eq!(entries[2].credential.as_deref(), Some("#0 email"));
    }

    #[test]
    fn query_with_limit() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        for i in 0..10 {
            audit.log("get", "main.vault", Some(&format!("#{i}")), None);
        }

        let entries = audit.query(3, None).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn query_with_since_filter() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("add", "main.vault", Some("#0 email"), None);

        let past = Utc::now() - chrono::Duration::hours(1);
        let entries = audit.query(10, Some(past)).unwrap();
        assert_eq!(entries.len(), 1);

        let future = Utc::now() + chrono::Duration::hours(1);
        let entries = audit.query(10, Some(future)).unwrap();
        assert_eq!(entries.len(), 0);
    }

    #[test]
    fn log_records_vault_and_details() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("init", "/tmp/personal.vault", None, Some("vault created"));

        let entries = audit.query(1, None).unwrap();
        assert_eq!(entries[0].vault, "/tmp/personal.vault");
        assert_eq!(entries[0].operation, "init");
        assert!(entries[0].credential.is_none());
        assert_eq!(entries[0].details.as_deref(), Some("vault created"));
    }

    #[test]
    fn open_returns_none_on_bad_path() {
        let result = AuditLog::open(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(result.is_none());
    }

    #[test]
    fn audit_dir_is_vault_parent() {
        assert_eq!(
            audit_dir(Path::new("/home/u/vaults/main.vault")),
            PathBuf::from("/home/u/vaults")
        );
        assert_eq!(audit_dir(Path::new("main.vault")), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn audit_db_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let _audit = AuditLog::open(dir.path()).unwrap();

        let perms = std::fs::metadata(dir.path().join("audit.db"))
            .unwrap()
            .permissions();
        assert_eq!(
            perms.mode() & 0o777,
            0o600,
            "audit.db should have 0o600 permissions"
        );
    }
}
