//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 16-byte IV and returns
//! it alongside the ciphertext and the detached 16-byte tag, matching the
//! three fields of the vault envelope.  GCM is an AEAD mode, so no block
//! padding is applied: the ciphertext is exactly as long as the plaintext.
//!
//! `associated_data` is authenticated but not encrypted.  The vault passes
//! the envelope header (format version + salt) so tampering with it is
//! caught by the same tag check.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use zeroize::Zeroizing;

use super::keys::KEY_LEN;
use crate::errors::{VaultError, Result};

/// Size of the IV in bytes.
pub const IV_LEN: usize = 16;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// AES-256-GCM with a 128-bit nonce.
type VaultCipher = AesGcm<Aes256, U16>;

/// Output of `encrypt`: everything needed to decrypt except the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

/// Encrypt `plaintext` with a 32-byte `key` under a fresh random IV.
pub fn encrypt(key: &[u8], plaintext: &[u8], associated_data: &[u8]) -> Result<SealedPayload> {
    let cipher = build_cipher(key)?;
    let iv = super::random_bytes::<IV_LEN>()?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&iv), associated_data, &mut buffer)
        .map_err(|_| VaultError::InvalidInput("plaintext too large to encrypt".into()))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(SealedPayload {
        iv,
        ciphertext: buffer,
        tag: tag_bytes,
    })
}

/// Verify the tag and decrypt.
///
/// The tag is checked in constant time before any plaintext is produced.
/// Every authentication failure maps to the same
/// `WrongPasswordOrCorrupt` error, whatever its cause.
pub fn decrypt(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
    associated_data: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if iv.len() != IV_LEN {
        return Err(VaultError::InvalidInput(format!(
            "IV must be exactly {IV_LEN} bytes (got {})",
            iv.len()
        )));
    }
    if tag.len() != TAG_LEN {
        return Err(VaultError::InvalidInput(format!(
            "authentication tag must be exactly {TAG_LEN} bytes (got {})",
            tag.len()
        )));
    }

    let cipher = build_cipher(key)?;

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            associated_data,
            &mut buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| VaultError::WrongPasswordOrCorrupt)?;

    Ok(buffer)
}

fn build_cipher(key: &[u8]) -> Result<VaultCipher> {
    if key.len() != KEY_LEN {
        return Err(VaultError::InvalidInput(format!(
            "key must be exactly {KEY_LEN} bytes (got {})",
            key.len()
        )));
    }
    VaultCipher::new_from_slice(key)
        .map_err(|e| VaultError::InvalidInput(format!("invalid key: {e}")))
}
