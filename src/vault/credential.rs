//! Credential types stored inside a vault.
//!
//! A `Credential` is one account for one service.  Its `id` is allocated
//! by the repository and never changes; service + username pairs are not
//! required to be unique.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Stable identifier of a credential within one vault.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Zeroize,
)]
#[serde(transparent)]
pub struct CredentialId(pub u64);

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single decrypted credential.
///
/// All text fields are wiped when the credential is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    pub id: CredentialId,
    pub service: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,
    #[zeroize(skip)]
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("service", &self.service)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("url", &self.url)
            .field("notes", &self.notes.as_ref().map(|_| "[REDACTED]"))
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Fields supplied when adding a credential.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct CredentialFields {
    pub service: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl CredentialFields {
    pub fn new(service: &str, username: &str, password: &str) -> Self {
        Self {
            service: service.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            url: None,
            notes: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// A partial update: `None` leaves the field unchanged.
///
/// For `url` and `notes`, `Some("")` clears the field.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct CredentialUpdate {
    pub service: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl CredentialUpdate {
    /// Returns `true` if no field would change.
    pub fn is_empty(&self) -> bool {
        self.service.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.url.is_none()
            && self.notes.is_none()
    }
}

/// Sort order for `CredentialRepository::list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Service,
    Username,
    CreatedAt,
    UpdatedAt,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "service" => Ok(Self::Service),
            "username" | "user" => Ok(Self::Username),
            "created" | "created_at" | "created-at" => Ok(Self::CreatedAt),
            "updated" | "updated_at" | "updated-at" => Ok(Self::UpdatedAt),
            other => Err(format!(
                "unknown sort key '{other}' — use service, username, created, or updated"
            )),
        }
    }
}
