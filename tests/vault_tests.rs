//! Integration tests for the PassVault vault module.

use std::fs;

use passvault::crypto::KdfParams;
use passvault::errors::VaultError;
use passvault::vault::format::{self, VaultLock};
use passvault::vault::{CredentialFields, CredentialId, CredentialUpdate, SortKey, VaultState, VaultStore};
use tempfile::TempDir;

/// Helper: create a temporary vault file path inside a fresh temp dir.
fn vault_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("test.vault");
    (dir, path)
}

fn store_at(path: &std::path::Path) -> VaultStore {
    VaultStore::new(path, KdfParams::default())
}

// ---------------------------------------------------------------------------
// End-to-end lifecycle
// ---------------------------------------------------------------------------

#[test]
fn create_add_lock_unlock_roundtrip() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    let session = store.create(b"Tr0ub4dor&3").unwrap();
    let id = session
        .credentials_mut()
        .add(CredentialFields::new("email", "alice", "hunter2"))
        .unwrap();
    store.save().unwrap();
    store.lock().unwrap();

    // A fresh handle, as a new process would have.
    let mut reopened = store_at(&path);
    let session = reopened.unlock(b"Tr0ub4dor&3").unwrap();
    let list = session.credentials().list(None, None);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, id);
    assert_eq!(list[0].service, "email");
    assert_eq!(list[0].username, "alice");
    assert_eq!(list[0].password, "hunter2");
}

#[test]
fn wrong_password_is_rejected() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store.create(b"Tr0ub4dor&3").unwrap();
    store.lock().unwrap();

    let result = store.unlock(b"wrong");
    assert!(matches!(result, Err(VaultError::WrongPasswordOrCorrupt)));
    assert_eq!(store.state(), VaultState::Locked);
}

#[test]
fn unsaved_changes_are_discarded_on_lock() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store
        .create(b"pw-unsaved")
        .unwrap()
        .credentials_mut()
        .add(CredentialFields::new("bank", "bob", "s3cret"))
        .unwrap();
    store.lock().unwrap();

    let session = store.unlock(b"pw-unsaved").unwrap();
    assert!(session.credentials().is_empty());
}

#[test]
fn save_keeps_salt_but_changes_iv() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store.create(b"pw-iv").unwrap();
    let first = format::read_envelope(&path).unwrap();

    store.save().unwrap();
    let second = format::read_envelope(&path).unwrap();

    assert_eq!(first.salt, second.salt);
    assert_ne!(first.iv, second.iv);
}

// ---------------------------------------------------------------------------
// State machine errors
// ---------------------------------------------------------------------------

#[test]
fn create_over_existing_vault_fails() {
    let (_dir, path) = vault_path();

    store_at(&path).create(b"first").unwrap();
    let before = fs::read(&path).unwrap();

    let mut store = store_at(&path);
    let result = store.create(b"second");
    assert!(matches!(result, Err(VaultError::AlreadyExists(_))));
    assert_eq!(fs::read(&path).unwrap(), before, "existing vault must be untouched");
}

#[test]
fn unlock_missing_vault_is_not_found() {
    let (_dir, path) = vault_path();
    let mut store = store_at(&path);
    let result = store.unlock(b"pw");
    assert!(matches!(result, Err(VaultError::VaultNotFound(_))));
}

#[test]
fn empty_file_counts_as_missing() {
    let (_dir, path) = vault_path();
    fs::write(&path, b"").unwrap();

    let mut store = store_at(&path);
    assert_eq!(store.state(), VaultState::Uninitialized);
    assert!(matches!(
        store.unlock(b"pw"),
        Err(VaultError::VaultNotFound(_))
    ));
    store.create(b"pw").unwrap();
}

#[test]
fn operations_after_lock_report_session_closed() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store.create(b"pw").unwrap();
    store.lock().unwrap();

    assert!(matches!(store.session(), Err(VaultError::SessionClosed)));
    assert!(matches!(store.session_mut(), Err(VaultError::SessionClosed)));
    assert!(matches!(store.save(), Err(VaultError::SessionClosed)));
    assert!(matches!(store.lock(), Err(VaultError::SessionClosed)));
    assert!(matches!(
        store.change_master_password(b"new"),
        Err(VaultError::SessionClosed)
    ));
}

#[test]
fn double_unlock_is_rejected() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store.create(b"pw").unwrap();
    assert!(matches!(
        store.unlock(b"pw"),
        Err(VaultError::AlreadyUnlocked)
    ));
    assert!(matches!(
        store.create(b"pw"),
        Err(VaultError::AlreadyUnlocked)
    ));
}

#[test]
fn held_lock_makes_save_busy() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store.create(b"pw").unwrap();

    let held = VaultLock::acquire(&path).unwrap();
    assert!(matches!(store.save(), Err(VaultError::VaultBusy(_))));

    drop(held);
    store.save().unwrap();
}

// ---------------------------------------------------------------------------
// Master password change
// ---------------------------------------------------------------------------

#[test]
fn change_master_password_reencrypts() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store
        .create(b"old-password")
        .unwrap()
        .credentials_mut()
        .add(CredentialFields::new("email", "alice", "hunter2"))
        .unwrap();
    store.save().unwrap();
    let old_salt = format::read_envelope(&path).unwrap().salt;

    store.change_master_password(b"new-password").unwrap();
    assert!(store.verify_master_password(b"new-password").unwrap());
    assert_ne!(format::read_envelope(&path).unwrap().salt, old_salt);
    store.lock().unwrap();

    assert!(matches!(
        store.unlock(b"old-password"),
        Err(VaultError::WrongPasswordOrCorrupt)
    ));
    let session = store.unlock(b"new-password").unwrap();
    assert_eq!(session.credentials().get(CredentialId(0)).unwrap().password, "hunter2");
}

#[test]
fn verify_master_password_checks_without_io() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store.create(b"correct horse").unwrap();
    fs::remove_file(&path).unwrap();

    assert!(store.verify_master_password(b"correct horse").unwrap());
    assert!(!store.verify_master_password(b"battery staple").unwrap());
    assert!(!store.verify_master_password(b"").unwrap());
}

// ---------------------------------------------------------------------------
// Atomic writes
// ---------------------------------------------------------------------------

#[test]
fn staged_but_uncommitted_write_leaves_vault_intact() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store
        .create(b"pw-crash")
        .unwrap()
        .credentials_mut()
        .add(CredentialFields::new("email", "alice", "hunter2"))
        .unwrap();
    store.save().unwrap();
    let committed = fs::read(&path).unwrap();

    // Simulate a crash between writing the temp file and renaming it.
    let mut garbage = format::read_envelope(&path).unwrap();
    garbage.ciphertext = vec![0xAB; 64];
    let tmp = format::stage_envelope(&path, &garbage).unwrap();
    assert!(tmp.exists());

    assert_eq!(fs::read(&path).unwrap(), committed);
    store.lock().unwrap();
    let session = store.unlock(b"pw-crash").unwrap();
    assert_eq!(session.credentials().len(), 1);
}

#[test]
fn failed_temp_write_leaves_old_vault_loadable() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store.create(b"pw-fail").unwrap();
    let committed = fs::read(&path).unwrap();

    // A directory squatting on the temp path makes the write fail.
    fs::create_dir(format::temp_path(&path)).unwrap();
    store
        .session_mut()
        .unwrap()
        .credentials_mut()
        .add(CredentialFields::new("email", "alice", "hunter2"))
        .unwrap();
    assert!(matches!(store.save(), Err(VaultError::Io(_))));

    assert_eq!(fs::read(&path).unwrap(), committed);
    let mut other = store_at(&path);
    assert!(other.unlock(b"pw-fail").unwrap().credentials().is_empty());
}

// ---------------------------------------------------------------------------
// Tampering
// ---------------------------------------------------------------------------

#[test]
fn tampered_file_is_indistinguishable_from_wrong_password() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    store.create(b"pw-tamper").unwrap();
    store.lock().unwrap();

    let original = fs::read(&path).unwrap();
    // Flip one bit in each region after the version byte.
    for offset in [1, 17, 33, 49] {
        let mut bytes = original.clone();
        bytes[offset] ^= 0x01;
        fs::write(&path, &bytes).unwrap();

        let mut store = store_at(&path);
        let result = store.unlock(b"pw-tamper");
        assert!(
            matches!(result, Err(VaultError::WrongPasswordOrCorrupt)),
            "flip at offset {offset} should fail authentication"
        );
    }
}

#[test]
fn truncated_file_is_corrupt() {
    let (_dir, path) = vault_path();
    fs::write(&path, [1u8; 20]).unwrap();

    let mut store = store_at(&path);
    let result = store.unlock(b"pw");
    assert!(matches!(result, Err(VaultError::CorruptData(_))));
}

// ---------------------------------------------------------------------------
// Repository behaviour through a live session
// ---------------------------------------------------------------------------

#[test]
fn add_then_remove_restores_previous_entries() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    let repo = store.create(b"pw").unwrap().credentials_mut();
    repo.add(CredentialFields::new("email", "alice", "hunter2"))
        .unwrap();
    let before: Vec<_> = repo.list(None, None).into_iter().cloned().collect();

    let id = repo
        .add(CredentialFields::new("bank", "bob", "s3cret"))
        .unwrap();
    repo.remove(id).unwrap();

    let after: Vec<_> = repo.list(None, None).into_iter().cloned().collect();
    assert_eq!(before, after);
    assert!(matches!(
        repo.remove(id),
        Err(VaultError::CredentialNotFound(_))
    ));
}

#[test]
fn update_and_sorted_listing_survive_save() {
    let (_dir, path) = vault_path();

    let mut store = store_at(&path);
    let repo = store.create(b"pw").unwrap().credentials_mut();
    let github = repo
        .add(CredentialFields::new("github", "carol", "gh-pass").with_url("https://github.com"))
        .unwrap();
    repo.add(CredentialFields::new("bank", "bob", "bank-pass"))
        .unwrap();

    let mut update = CredentialUpdate::default();
    update.password = Some("gh-pass-2".into());
    update.url = Some(String::new());
    repo.update(github, update).unwrap();
    store.save().unwrap();
    store.lock().unwrap();

    let session = store.unlock(b"pw").unwrap();
    let sorted = session.credentials().list(None, Some(SortKey::Service));
    let services: Vec<&str> = sorted.iter().map(|c| c.service.as_str()).collect();
    assert_eq!(services, ["bank", "github"]);

    let gh = session.credentials().get(github).unwrap();
    assert_eq!(gh.password, "gh-pass-2");
    assert!(gh.url.is_none());
    assert!(gh.updated_at >= gh.created_at);
}

#[cfg(unix)]
#[test]
fn vault_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = vault_path();
    store_at(&path).create(b"pw").unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
