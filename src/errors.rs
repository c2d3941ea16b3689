use std::path::PathBuf;
use thiserror::Error;

use crate::vault::CredentialId;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Input errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Vault is already unlocked — lock it before unlocking again")]
    AlreadyUnlocked,

    #[error("Vault session is closed — unlock the vault first")]
    SessionClosed,

    /// Authentication failed.  Deliberately carries no detail: a wrong
    /// master password and a tampered file must look the same.
    #[error("Wrong master password or corrupted vault")]
    WrongPasswordOrCorrupt,

    #[error("Corrupt vault data: {0}")]
    CorruptData(String),

    #[error("Vault at {0} is locked by another process")]
    VaultBusy(PathBuf),

    #[error("Credential #{0} not found")]
    CredentialNotFound(CredentialId),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    Audit(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
