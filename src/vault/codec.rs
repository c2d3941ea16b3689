//! Plaintext encoding of the credential collection.
//!
//! The decrypted payload of a vault is a JSON document:
//!
//! ```text
//! {"format_version":1,"next_id":3,"credentials":[{...},{...}]}
//! ```
//!
//! Credentials are written in insertion order, so encoding the same
//! collection twice yields identical bytes.  The document carries its own
//! version, independent of the envelope version, so the record layout can
//! evolve without changing the binary file format.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::credential::Credential;
use super::repository::CredentialCollection;
use crate::errors::{VaultError, Result};

/// Current payload format version.
pub const CODEC_VERSION: u8 = 1;

#[derive(Serialize)]
struct DocumentRef<'a> {
    format_version: u8,
    next_id: u64,
    credentials: &'a [Credential],
}

#[derive(Deserialize)]
struct Document {
    format_version: u8,
    next_id: u64,
    credentials: Vec<Credential>,
}

/// Only the version field, read first so a newer document is reported as
/// unsupported rather than as a confusing field error.
#[derive(Deserialize)]
struct VersionHeader {
    format_version: u8,
}

/// Encode a collection into plaintext bytes (wiped on drop).
pub fn serialize(collection: &CredentialCollection) -> Result<Zeroizing<Vec<u8>>> {
    let doc = DocumentRef {
        format_version: CODEC_VERSION,
        next_id: collection.next_id(),
        credentials: collection.credentials(),
    };
    serde_json::to_vec(&doc)
        .map(Zeroizing::new)
        .map_err(|e| VaultError::CorruptData(format!("failed to encode credentials: {e}")))
}

/// Decode plaintext bytes back into a collection.
///
/// Fails with `CorruptData` on malformed input, an unsupported version,
/// duplicate ids, or an id counter that would hand out a used id.
pub fn deserialize(bytes: &[u8]) -> Result<CredentialCollection> {
    let header: VersionHeader = serde_json::from_slice(bytes)
        .map_err(|e| VaultError::CorruptData(format!("credential payload: {e}")))?;
    if header.format_version == 0 || header.format_version > CODEC_VERSION {
        return Err(VaultError::CorruptData(format!(
            "unsupported credential format version {}, expected at most {CODEC_VERSION}",
            header.format_version
        )));
    }

    let doc: Document = serde_json::from_slice(bytes)
        .map_err(|e| VaultError::CorruptData(format!("credential payload: {e}")))?;

    let mut seen = HashSet::with_capacity(doc.credentials.len());
    for credential in &doc.credentials {
        if !seen.insert(credential.id) {
            return Err(VaultError::CorruptData(format!(
                "duplicate credential id {}",
                credential.id
            )));
        }
        if credential.id.0 >= doc.next_id {
            return Err(VaultError::CorruptData(format!(
                "credential id {} is not below the id counter {}",
                credential.id, doc.next_id
            )));
        }
    }

    Ok(CredentialCollection::from_parts(doc.next_id, doc.credentials))
}
