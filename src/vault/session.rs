//! The live, decrypted view of one unlocked vault.

use std::fmt;

use zeroize::Zeroize;

use super::repository::{CredentialCollection, CredentialRepository};
use crate::crypto::kdf::SALT_LEN;
use crate::crypto::keys::DerivedKey;

/// Secret state of an unlocked vault: the derived key, the salt it was
/// derived with, and the decrypted credentials.
///
/// Owned by `VaultStore`.  The key and every credential are zeroized when
/// the session is dropped, which `VaultStore::lock` does explicitly.
pub struct Session {
    key: DerivedKey,
    salt: [u8; SALT_LEN],
    repository: CredentialRepository,
}

impl Session {
    pub(crate) fn new(
        key: DerivedKey,
        salt: [u8; SALT_LEN],
        collection: CredentialCollection,
    ) -> Self {
        Self {
            key,
            salt,
            repository: CredentialRepository::new(collection),
        }
    }

    /// The credentials of this session.
    pub fn credentials(&self) -> &CredentialRepository {
        &self.repository
    }

    /// Mutable access for add/update/remove.  Changes stay in memory
    /// until `VaultStore::save`.
    pub fn credentials_mut(&mut self) -> &mut CredentialRepository {
        &mut self.repository
    }

    pub(crate) fn key(&self) -> &DerivedKey {
        &self.key
    }

    pub(crate) fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Swap in a new key and salt, returning the previous pair so the
    /// caller can roll back.
    pub(crate) fn rekey(
        &mut self,
        key: DerivedKey,
        salt: [u8; SALT_LEN],
    ) -> (DerivedKey, [u8; SALT_LEN]) {
        let old_key = std::mem::replace(&mut self.key, key);
        let old_salt = std::mem::replace(&mut self.salt, salt);
        (old_key, old_salt)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // The key and collection wipe themselves; the salt is not secret
        // but there is no reason to leave it behind either.
        self.salt.zeroize();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("credentials", &self.repository.len())
            .finish()
    }
}
