//! Author identities and partial updates.
//!
//! An [`AuthorRecord`] is one saved commit identity. An [`AuthorPatch`] is
//! the partial form used for merge-on-write updates: every field it carries
//! overwrites, every field it omits is preserved.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The author registry, keyed by email.
///
/// Ordered so that listings and the persisted encoding are deterministic.
pub type Registry = BTreeMap<String, AuthorRecord>;

/// One saved commit identity.
///
/// Field names follow the structured stored format (`name`, `email`,
/// `privateKeyPath`), so entries written by earlier releases decode as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRecord {
    /// Display name. Required for the record to be usable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address, the unique registry key.
    #[serde(default)]
    pub email: String,
    /// Path to the signing key. Absent or empty means commits are not signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<String>,
}

impl AuthorRecord {
    /// Create a record with a name and email and no signing key.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
            private_key_path: None,
        }
    }

    /// Builder method to set the signing key path.
    pub fn with_private_key(mut self, path: impl Into<String>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    /// The display name, if set and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// The signing key path, if set and non-empty.
    pub fn signing_key(&self) -> Option<&str> {
        self.private_key_path.as_deref().filter(|p| !p.is_empty())
    }

    /// True when both name and email are non-empty.
    pub fn is_usable(&self) -> bool {
        self.name().is_some() && !self.email.is_empty()
    }

    /// Overwrite every field present in `patch`, keep the rest.
    pub fn apply(&mut self, patch: &AuthorPatch) {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(path) = &patch.private_key_path {
            self.private_key_path = Some(path.clone());
        }
    }
}

/// A partial [`AuthorRecord`] for merge-on-write updates.
///
/// To stop signing for an identity, set `private_key_path` to an empty
/// string: an absent field would preserve the stored key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub private_key_path: Option<String>,
}

impl AuthorPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn private_key_path(mut self, path: impl Into<String>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.private_key_path.is_none()
    }
}

impl From<AuthorRecord> for AuthorPatch {
    fn from(record: AuthorRecord) -> Self {
        Self {
            name: record.name,
            email: Some(record.email),
            private_key_path: record.private_key_path,
        }
    }
}

impl From<&AuthorRecord> for AuthorPatch {
    fn from(record: &AuthorRecord) -> Self {
        record.clone().into()
    }
}
