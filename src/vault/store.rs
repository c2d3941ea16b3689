//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` ties the envelope format, the crypto layer, and the codec
//! together behind a small state machine:
//!
//! ```text
//! Uninitialized --create--> Unlocked
//! Locked        --unlock--> Unlocked --lock--> Locked
//! ```
//!
//! A store holds at most one `Session`.  The session is dropped (and its
//! key and credentials zeroized) on `lock` or when the store is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::kdf::{derive_key_with_params, generate_salt, KdfParams};
use crate::errors::{VaultError, Result};

use super::codec;
use super::format::{self, VaultEnvelope, VaultLock, CURRENT_VERSION};
use super::repository::CredentialCollection;
use super::session::Session;

/// Where a `VaultStore` is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No vault file exists yet.
    Uninitialized,
    /// A vault file exists but no session is open.
    Locked,
    /// A session is open.
    Unlocked,
}

/// The main vault handle.  Create one with `VaultStore::new`, then
/// `create` or `unlock` it to get a session.
pub struct VaultStore {
    /// Path to the `.vault` file on disk.
    path: PathBuf,

    /// PBKDF2 settings used for every derivation.
    kdf_params: KdfParams,

    /// The active session, if unlocked.
    session: Option<Session>,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// A locked handle for the vault at `path`.  Nothing is read yet.
    pub fn new(path: &Path, kdf_params: KdfParams) -> Self {
        Self {
            path: path.to_path_buf(),
            kdf_params,
            session: None,
        }
    }

    /// Create a brand-new vault file at `path`.
    ///
    /// Generates a random salt, derives the key from the master password,
    /// and writes an empty vault to disk.  The new session is returned.
    pub fn create(&mut self, master_password: &[u8]) -> Result<&mut Session> {
        if self.session.is_some() {
            return Err(VaultError::AlreadyUnlocked);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        // Hold the lock across the existence check so two processes cannot
        // both create the same vault.
        let lock = VaultLock::acquire(&self.path)?;
        if format::vault_exists(&self.path) {
            return Err(VaultError::AlreadyExists(self.path.clone()));
        }

        let salt = generate_salt()?;
        let key = derive_key_with_params(master_password, &salt, &self.kdf_params)?;
        let session = Session::new(key, salt, CredentialCollection::default());

        format::write_envelope(&self.path, &seal(&session)?, &lock)?;
        tracing::debug!(path = %self.path.display(), "vault created");

        Ok(self.session.insert(session))
    }

    /// Open an existing vault and start a session.
    ///
    /// A wrong password and a tampered file both fail with
    /// `WrongPasswordOrCorrupt`; the two cases are indistinguishable.
    pub fn unlock(&mut self, master_password: &[u8]) -> Result<&mut Session> {
        if self.session.is_some() {
            return Err(VaultError::AlreadyUnlocked);
        }

        // 1. Read and structurally parse the envelope.
        let envelope = format::read_envelope(&self.path)?;

        // 2. Derive the key with the stored salt.
        let key = derive_key_with_params(master_password, &envelope.salt, &self.kdf_params)?;

        // 3. Verify the tag and decrypt.
        let aad = VaultEnvelope::associated_data(envelope.version, &envelope.salt);
        let plaintext = decrypt(
            key.as_bytes(),
            &envelope.iv,
            &envelope.ciphertext,
            &envelope.tag,
            &aad,
        )?;

        // 4. Decode the now-authenticated payload.
        let collection = codec::deserialize(&plaintext)?;
        tracing::debug!(
            path = %self.path.display(),
            credentials = collection.len(),
            "vault unlocked"
        );

        Ok(self.session.insert(Session::new(key, envelope.salt, collection)))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Re-encrypt the session's credentials under a fresh IV and replace
    /// the vault file atomically.  The salt is unchanged.
    ///
    /// Fails with `VaultBusy` if another process is writing the vault.
    pub fn save(&mut self) -> Result<()> {
        let session = self.session.as_ref().ok_or(VaultError::SessionClosed)?;

        let lock = VaultLock::acquire(&self.path)?;
        format::write_envelope(&self.path, &seal(session)?, &lock)?;

        tracing::debug!(
            path = %self.path.display(),
            credentials = session.credentials().len(),
            "vault saved"
        );
        Ok(())
    }

    /// Change the master password.
    ///
    /// Generates a fresh salt, derives a new key, and re-encrypts the
    /// whole vault.  If the write fails the session keeps its old key and
    /// salt, matching the file that is still on disk.
    pub fn change_master_password(&mut self, new_password: &[u8]) -> Result<()> {
        let kdf_params = self.kdf_params;
        let session = self.session.as_mut().ok_or(VaultError::SessionClosed)?;

        let new_salt = generate_salt()?;
        let new_key = derive_key_with_params(new_password, &new_salt, &kdf_params)?;
        let (old_key, old_salt) = session.rekey(new_key, new_salt);

        match self.save() {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "master password changed");
                Ok(())
            }
            Err(e) => {
                if let Some(session) = self.session.as_mut() {
                    session.rekey(old_key, old_salt);
                }
                Err(e)
            }
        }
    }

    /// End the session, wiping the key and every decrypted credential.
    ///
    /// Unsaved changes are discarded.
    pub fn lock(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(VaultError::SessionClosed)?;
        drop(session);
        tracing::debug!(path = %self.path.display(), "vault locked");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Session access
    // ------------------------------------------------------------------

    /// The active session, or `SessionClosed`.
    pub fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(VaultError::SessionClosed)
    }

    /// The active session for mutation, or `SessionClosed`.
    pub fn session_mut(&mut self) -> Result<&mut Session> {
        self.session.as_mut().ok_or(VaultError::SessionClosed)
    }

    /// Check `candidate` against the unlocked session's key in constant
    /// time, without touching the file.
    pub fn verify_master_password(&self, candidate: &[u8]) -> Result<bool> {
        let session = self.session()?;
        session
            .key()
            .verify(candidate, session.salt(), &self.kdf_params)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Current lifecycle state.
    pub fn state(&self) -> VaultState {
        if self.session.is_some() {
            VaultState::Unlocked
        } else if format::vault_exists(&self.path) {
            VaultState::Locked
        } else {
            VaultState::Uninitialized
        }
    }

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the PBKDF2 settings in use.
    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }
}

/// Serialize and encrypt a session into a fresh envelope.
fn seal(session: &Session) -> Result<VaultEnvelope> {
    let plaintext = codec::serialize(session.credentials().collection())?;
    let aad = VaultEnvelope::associated_data(CURRENT_VERSION, session.salt());
    let sealed = encrypt(session.key().as_bytes(), &plaintext, &aad)?;

    Ok(VaultEnvelope {
        version: CURRENT_VERSION,
        salt: *session.salt(),
        iv: sealed.iv,
        tag: sealed.tag,
        ciphertext: sealed.ciphertext,
    })
}
