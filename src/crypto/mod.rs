//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption and decryption (`encryption`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - The zeroizing `DerivedKey` wrapper (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{VaultError, Result};

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, SealedPayload};
pub use kdf::{derive_key, derive_key_with_params, generate_salt, KdfParams};
pub use keys::DerivedKey;

/// Fill an `N`-byte array straight from the operating system RNG.
pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    OsRng.try_fill_bytes(&mut buf).map_err(|e| {
        VaultError::Io(std::io::Error::other(format!("OS random source failed: {e}")))
    })?;
    Ok(buf)
}
