//! The derived vault key.
//!
//! `DerivedKey` owns the 32 bytes that PBKDF2 produced for the active
//! session.  The bytes are wiped when the key is dropped, equality is
//! checked in constant time, and `Debug` never prints the key.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::kdf::{derive_key_with_params, KdfParams};
use crate::errors::{VaultError, Result};

/// Length of the derived key (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A 32-byte symmetric key that zeroes its memory when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Re-derive a key from `candidate` and compare it with this one in
    /// constant time.
    ///
    /// Used to confirm the current master password before sensitive
    /// operations without re-reading the vault file.
    pub fn verify(&self, candidate: &[u8], salt: &[u8], params: &KdfParams) -> Result<bool> {
        match derive_key_with_params(candidate, salt, params) {
            Ok(other) => Ok(self == &other),
            // An empty candidate can never be the master password.
            Err(VaultError::InvalidInput(_)) if candidate.is_empty() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for DerivedKey {}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}
