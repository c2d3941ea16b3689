//! Binary vault file format and atomic envelope writes.
//!
//! A `.vault` file has this layout:
//!
//! ```text
//! [version: 1 byte][salt: 16 bytes][iv: 16 bytes][tag: 16 bytes][ciphertext: rest]
//! ```
//!
//! - **Version**: envelope format version (currently `1`).
//! - **Salt**: PBKDF2 salt, fixed for the life of the vault (rotated only
//!   when the master password changes).
//! - **IV**: fresh for every save.
//! - **Tag**: AES-GCM tag over the ciphertext, with `version || salt` as
//!   associated data.
//! - **Ciphertext**: the encrypted credential payload (see `codec`).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use fs2::FileExt;

use crate::crypto::encryption::{IV_LEN, TAG_LEN};
use crate::crypto::kdf::SALT_LEN;
use crate::errors::{VaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Bytes before the ciphertext: version + salt + iv + tag.
pub const HEADER_LEN: usize = 1 + SALT_LEN + IV_LEN + TAG_LEN;

/// Bytes covered as associated data: version + salt.
const AAD_LEN: usize = 1 + SALT_LEN;

/// How many times a failed rename is attempted before giving up.
const RENAME_ATTEMPTS: u32 = 3;

/// Pause between rename attempts.
const RENAME_BACKOFF: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// VaultEnvelope
// ---------------------------------------------------------------------------

/// The complete on-disk unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEnvelope {
    pub version: u8,
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
    pub tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

impl VaultEnvelope {
    /// The bytes authenticated alongside the ciphertext.
    pub fn associated_data(version: u8, salt: &[u8; SALT_LEN]) -> [u8; AAD_LEN] {
        let mut aad = [0u8; AAD_LEN];
        aad[0] = version;
        aad[1..].copy_from_slice(salt);
        aad
    }

    /// Serialize to the binary file layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        buf.push(self.version); // 1 byte
        buf.extend_from_slice(&self.salt); // 16 bytes
        buf.extend_from_slice(&self.iv); // 16 bytes
        buf.extend_from_slice(&self.tag); // 16 bytes
        buf.extend_from_slice(&self.ciphertext);
        buf
    }

    /// Parse the binary file layout.
    ///
    /// Only the structure is checked here; authenticity is established
    /// later by the tag check during decryption.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(VaultError::CorruptData(format!(
                "file too small to be a valid vault ({} bytes, need at least {HEADER_LEN})",
                data.len()
            )));
        }

        let version = data[0];
        if version != CURRENT_VERSION {
            return Err(VaultError::CorruptData(format!(
                "unsupported vault version {version}, expected {CURRENT_VERSION}"
            )));
        }

        let (salt, rest) = data[1..].split_at(SALT_LEN);
        let (iv, rest) = rest.split_at(IV_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        Ok(Self {
            version,
            salt: to_array(salt)?,
            iv: to_array(iv)?,
            tag: to_array(tag)?,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

fn to_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| VaultError::CorruptData("truncated vault header".into()))
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Returns `true` if a vault with content exists at `path`.
///
/// A zero-length file is treated as "no vault yet".
pub fn vault_exists(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

/// Read and parse the envelope at `path`.
pub fn read_envelope(path: &Path) -> Result<VaultEnvelope> {
    if !vault_exists(path) {
        return Err(VaultError::VaultNotFound(path.to_path_buf()));
    }
    let data = fs::read(path)?;
    VaultEnvelope::from_bytes(&data)
}

// ---------------------------------------------------------------------------
// Atomic writes
// ---------------------------------------------------------------------------

/// Path of the temp file used while writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Path of the sidecar file used for cross-process locking.
pub fn lock_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.lock",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Write an envelope to disk **atomically**.
///
/// 1. Write the full envelope to a temp file in the same directory and
///    flush it to disk.
/// 2. Rename the temp file over the target path.
///
/// The caller must hold the `VaultLock` for `path`.  If any step fails
/// the previous vault file is left untouched.
pub fn write_envelope(path: &Path, envelope: &VaultEnvelope, _lock: &VaultLock) -> Result<()> {
    let tmp_path = stage_envelope(path, envelope)?;
    commit_staged(&tmp_path, path)
}

/// Write the envelope to the temp file next to `path` without touching
/// `path` itself.  Returns the temp file location.
pub fn stage_envelope(path: &Path, envelope: &VaultEnvelope) -> Result<PathBuf> {
    let tmp_path = temp_path(path);
    let result = write_synced(&tmp_path, &envelope.to_bytes());
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(tmp_path)
}

/// Move a staged temp file over `path`.
///
/// A failed rename is retried up to `RENAME_ATTEMPTS` times.  On final
/// failure the temp file is removed and the target is left as it was.
pub fn commit_staged(tmp_path: &Path, path: &Path) -> Result<()> {
    let mut attempt = 1;
    loop {
        match fs::rename(tmp_path, path) {
            Ok(()) => {
                sync_parent_dir(path);
                return Ok(());
            }
            Err(e) if attempt < RENAME_ATTEMPTS => {
                tracing::warn!(
                    attempt,
                    error = %e,
                    path = %path.display(),
                    "vault rename failed, retrying"
                );
                attempt += 1;
                thread::sleep(RENAME_BACKOFF);
            }
            Err(e) => {
                let _ = fs::remove_file(tmp_path);
                return Err(e.into());
            }
        }
    }
}

/// Flush the directory entry so the rename survives a power loss.
///
/// The new file is already in place, so a failure here is only logged.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
        tracing::warn!(error = %e, dir = %parent.display(), "directory sync failed");
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    // Owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

// ---------------------------------------------------------------------------
// Cross-process lock
// ---------------------------------------------------------------------------

/// An exclusive advisory lock on `<dir>/.<vault>.lock`.
///
/// Released when dropped (the OS drops the lock with the file handle).
pub struct VaultLock {
    _file: File,
}

impl VaultLock {
    /// Try to take the lock without blocking.
    ///
    /// Fails with `VaultBusy` if another handle already holds it.
    pub fn acquire(vault_path: &Path) -> Result<Self> {
        let lock_path = lock_path(vault_path);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { _file: file }),
            Err(e) if is_contended(&e) => Err(VaultError::VaultBusy(vault_path.to_path_buf())),
            Err(e) => Err(e.into()),
        }
    }
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
