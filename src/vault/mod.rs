//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - `Credential` and its input/update types (`credential`)
//! - In-memory CRUD over the decrypted credentials (`repository`)
//! - The plaintext payload encoding (`codec`)
//! - Binary vault file format, atomic writes, and locking (`format`)
//! - The unlocked `Session` (`session`)
//! - High-level `VaultStore` state machine (`store`)

pub mod codec;
pub mod credential;
pub mod format;
pub mod repository;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use credential::{Credential, CredentialFields, CredentialId, CredentialUpdate, SortKey};
pub use format::{VaultEnvelope, VaultLock};
pub use repository::{CredentialCollection, CredentialRepository};
pub use session::Session;
pub use store::{VaultState, VaultStore};
