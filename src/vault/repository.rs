//! In-memory CRUD over the decrypted credential collection.
//!
//! Nothing here touches the disk.  Callers batch edits through the
//! repository and then call `VaultStore::save` once to re-encrypt.

use chrono::Utc;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::credential::{Credential, CredentialFields, CredentialId, CredentialUpdate, SortKey};
use crate::errors::{VaultError, Result};

/// Insertion-ordered credentials plus the id allocation counter.
///
/// Ids are handed out from a counter that only grows, so the order of
/// `credentials` is also ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CredentialCollection {
    next_id: u64,
    credentials: Vec<Credential>,
}

impl CredentialCollection {
    /// Rebuild a collection from decoded parts.  The codec validates the
    /// parts before calling this.
    pub(crate) fn from_parts(next_id: u64, credentials: Vec<Credential>) -> Self {
        Self {
            next_id,
            credentials,
        }
    }

    /// The id the next `add` will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// All credentials in insertion order.
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

/// CRUD operations over an unlocked session's credentials.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CredentialRepository {
    collection: CredentialCollection,
}

impl CredentialRepository {
    pub fn new(collection: CredentialCollection) -> Self {
        Self { collection }
    }

    /// The underlying collection (what `VaultStore::save` serializes).
    pub fn collection(&self) -> &CredentialCollection {
        &self.collection
    }

    // ------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------

    /// Add a credential and return its newly allocated id.
    pub fn add(&mut self, fields: CredentialFields) -> Result<CredentialId> {
        validate_required("service", &fields.service)?;
        validate_required("password", &fields.password)?;

        let id = CredentialId(self.collection.next_id);
        self.collection.next_id = self
            .collection
            .next_id
            .checked_add(1)
            .ok_or_else(|| VaultError::InvalidInput("credential id space exhausted".into()))?;

        let now = Utc::now();
        self.collection.credentials.push(Credential {
            id,
            service: fields.service.trim().to_string(),
            username: fields.username.clone(),
            password: fields.password.clone(),
            url: non_empty(fields.url.as_deref()),
            notes: non_empty(fields.notes.as_deref()),
            created_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    /// Look up a credential by id.
    pub fn get(&self, id: CredentialId) -> Result<&Credential> {
        self.collection
            .credentials
            .iter()
            .find(|c| c.id == id)
            .ok_or(VaultError::CredentialNotFound(id))
    }

    /// Merge `update` into the credential and refresh `updated_at`.
    pub fn update(&mut self, id: CredentialId, update: CredentialUpdate) -> Result<()> {
        if let Some(service) = update.service.as_deref() {
            validate_required("service", service)?;
        }
        if let Some(password) = update.password.as_deref() {
            validate_required("password", password)?;
        }

        let credential = self
            .collection
            .credentials
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(VaultError::CredentialNotFound(id))?;

        if let Some(service) = update.service.as_deref() {
            replace(&mut credential.service, service.trim());
        }
        if let Some(username) = update.username.as_deref() {
            replace(&mut credential.username, username);
        }
        if let Some(password) = update.password.as_deref() {
            replace(&mut credential.password, password);
        }
        if let Some(url) = update.url.as_deref() {
            credential.url.zeroize();
            credential.url = non_empty(Some(url));
        }
        if let Some(notes) = update.notes.as_deref() {
            credential.notes.zeroize();
            credential.notes = non_empty(Some(notes));
        }

        // Never let updated_at fall behind created_at, even if the clock moved.
        credential.updated_at = Utc::now().max(credential.created_at);
        Ok(())
    }

    /// Remove a credential.  Its fields are wiped as it is dropped.
    pub fn remove(&mut self, id: CredentialId) -> Result<()> {
        let index = self
            .collection
            .credentials
            .iter()
            .position(|c| c.id == id)
            .ok_or(VaultError::CredentialNotFound(id))?;

        // `remove` keeps insertion order for the remaining entries.
        drop(self.collection.credentials.remove(index));
        Ok(())
    }

    /// List credentials, optionally filtered and sorted.
    ///
    /// `filter` is a case-insensitive substring match against service,
    /// username, and url.  Sorting is stable, so ties keep insertion order.
    pub fn list(&self, filter: Option<&str>, sort: Option<SortKey>) -> Vec<&Credential> {
        let needle = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let mut items: Vec<&Credential> = self
            .collection
            .credentials
            .iter()
            .filter(|c| match needle.as_deref() {
                Some(n) => matches_filter(c, n),
                None => true,
            })
            .collect();

        match sort {
            Some(SortKey::Service) => {
                items.sort_by_cached_key(|c| c.service.to_lowercase());
            }
            Some(SortKey::Username) => {
                items.sort_by_cached_key(|c| c.username.to_lowercase());
            }
            Some(SortKey::CreatedAt) => items.sort_by_key(|c| c.created_at),
            Some(SortKey::UpdatedAt) => items.sort_by_key(|c| c.updated_at),
            None => {}
        }

        items
    }

    // ------------------------------------------------------------------
    // Service-level helpers
    // ------------------------------------------------------------------

    /// Distinct service names, sorted case-insensitively.
    pub fn services(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .collection
            .credentials
            .iter()
            .map(|c| c.service.as_str())
            .collect();
        names.sort_by_cached_key(|s| (s.to_lowercase(), *s));
        names.dedup();
        names
    }

    /// All credentials whose service and username match exactly.
    pub fn find(&self, service: &str, username: &str) -> Vec<&Credential> {
        self.collection
            .credentials
            .iter()
            .filter(|c| c.service == service && c.username == username)
            .collect()
    }

    /// Remove every account stored for `service`.  Returns how many
    /// credentials were removed.
    pub fn remove_service(&mut self, service: &str) -> usize {
        let before = self.collection.credentials.len();
        self.collection.credentials.retain(|c| c.service != service);
        before - self.collection.credentials.len()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }
}

fn matches_filter(credential: &Credential, needle: &str) -> bool {
    credential.service.to_lowercase().contains(needle)
        || credential.username.to_lowercase().contains(needle)
        || credential
            .url
            .as_deref()
            .is_some_and(|u| u.to_lowercase().contains(needle))
}

fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VaultError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Overwrite a secret string, wiping the old contents first.
fn replace(target: &mut String, value: &str) {
    target.zeroize();
    target.push_str(value);
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
