//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The derived key is a single 256-bit AES key.  There is no separate
//! MAC key: integrity comes from the GCM tag.  The iteration count is
//! configurable but can only be raised above `MIN_ITERATIONS`.

use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{VaultError, Result};

/// Length of the per-vault salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Lowest accepted PBKDF2 iteration count.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Tunable PBKDF2 parameters.
///
/// Loaded from `.passvault.toml` (see `Settings::kdf_params`) or
/// defaulted.  The iteration count is not recorded in the vault file,
/// so the same value must be used to create and to unlock a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of PBKDF2 rounds (default: 100 000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: MIN_ITERATIONS,
        }
    }
}

/// Derive a 32-byte key from a password and salt with the default
/// iteration count.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
    derive_key_with_params(password, salt, &KdfParams::default())
}

/// Derive a 32-byte key with explicit PBKDF2 parameters.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(VaultError::InvalidInput(
            "master password cannot be empty".into(),
        ));
    }
    if salt.len() != SALT_LEN {
        return Err(VaultError::InvalidInput(format!(
            "salt must be exactly {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    if params.iterations < MIN_ITERATIONS {
        return Err(VaultError::InvalidInput(format!(
            "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
            params.iterations
        )));
    }

    let mut raw = [0u8; KEY_LEN];
    let derived = pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, params.iterations, &mut raw);

    // The array is `Copy`, so wipe the stack copy once it is wrapped.
    let key = DerivedKey::new(raw);
    raw.zeroize();

    derived.map_err(|e| VaultError::InvalidInput(format!("PBKDF2 failed: {e}")))?;
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    super::random_bytes::<SALT_LEN>()
}
