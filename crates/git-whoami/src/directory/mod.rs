//! The author directory — persisted, merge-on-write registry of identities.
//!
//! The whole registry lives under one store key ([`AUTHOR_DETAILS_KEY`]) as a
//! JSON object mapping each email to an encoded entry (see [`stored`]). Every
//! operation reads the slot afresh, so nothing cached in memory can go stale
//! across processes:
//!
//! | Method | Store traffic |
//! |--------|---------------|
//! | [`get_all`](AuthorDirectory::get_all) | one read |
//! | [`get_by_email`](AuthorDirectory::get_by_email) | one read |
//! | [`update`](AuthorDirectory::update) | one read, one write |
//! | [`delete`](AuthorDirectory::delete) | one read, one write when the key exists |
//! | [`reset`](AuthorDirectory::reset) | one write |
//!
//! Reads never fail. An unreadable payload is an empty registry and an
//! undecodable entry is a legacy bare name. Writes are stricter: `update` and
//! `delete` refuse to run over a slot that exists but cannot be read, so a bad
//! read never turns into a write that drops every saved identity. Writes
//! re-encode every entry in the structured format, which upgrades legacy
//! entries as a side effect.

pub mod stored;

pub use stored::StoredAuthor;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::author::{AuthorPatch, AuthorRecord, Registry};
use crate::error::{Result, WhoamiError};
use crate::storage::KeyValueStore;

/// Store key holding the entire registry.
pub const AUTHOR_DETAILS_KEY: &str = "git-author-details";

/// Registry of saved identities backed by an injected [`KeyValueStore`].
pub struct AuthorDirectory<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AuthorDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every saved identity, keyed by email.
    pub async fn get_all(&self) -> Registry {
        match self.load().await {
            Ok(registry) => registry,
            Err(e) => {
                log::warn!("ignoring unreadable author registry: {e}");
                Registry::new()
            }
        }
    }

    /// Read and decode the registry, failing when the slot is present but
    /// unreadable. Write paths start from this.
    async fn load(&self) -> Result<Registry> {
        let Some(bytes) = self.store.try_get(AUTHOR_DETAILS_KEY).await? else {
            return Ok(Registry::new());
        };

        let raw: BTreeMap<String, Value> = serde_json::from_slice(&bytes).map_err(|e| {
            WhoamiError::Serialization(format!(
                "author registry ({} bytes) is not a JSON object: {e}",
                bytes.len()
            ))
        })?;

        let mut legacy = 0usize;
        let registry: Registry = raw
            .into_iter()
            .map(|(email, value)| {
                let stored = StoredAuthor::decode_value(value);
                if stored.is_legacy() {
                    legacy += 1;
                }
                let record = stored.into_record(&email);
                (email, record)
            })
            .collect();

        log::debug!(
            "loaded {} authors ({legacy} in legacy format)",
            registry.len()
        );
        Ok(registry)
    }

    /// The identity saved under `email`, if any.
    pub async fn get_by_email(&self, email: &str) -> Option<AuthorRecord> {
        self.get_all().await.remove(email)
    }

    /// Merge `partial` into the registry and persist the result.
    ///
    /// For each email, fields present in the patch overwrite the stored
    /// ones and absent fields are kept; unknown emails create new entries.
    /// Applying the same update twice leaves the same registry as applying
    /// it once. Empty emails are skipped.
    ///
    /// Fails without writing when the stored registry cannot be read.
    pub async fn update<I, K>(&self, partial: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, AuthorPatch)>,
        K: Into<String>,
    {
        let mut registry = self.load().await?;

        for (email, patch) in partial {
            let email = email.into();
            if email.is_empty() {
                log::warn!("skipping author update with an empty email");
                continue;
            }
            if let Some(embedded) = patch.email.as_deref() {
                if embedded != email {
                    log::warn!("author update for {email} carries email {embedded}; using the key");
                }
            }

            let record = registry.entry(email.clone()).or_default();
            record.apply(&patch);
            record.email = email;
        }

        self.persist(&registry).await
    }

    /// Merge a whole record, keyed by its own email.
    pub async fn update_author(&self, record: &AuthorRecord) -> Result<()> {
        self.update([(record.email.clone(), AuthorPatch::from(record))])
            .await
    }

    /// Remove one identity. Unknown emails are a no-op. Fails without
    /// writing when the stored registry cannot be read.
    pub async fn delete(&self, email: &str) -> Result<()> {
        let mut registry = self.load().await?;
        if registry.remove(email).is_none() {
            log::debug!("delete: no author saved under {email}");
            return Ok(());
        }
        self.persist(&registry).await
    }

    /// Replace the registry with an empty one.
    pub async fn reset(&self) -> Result<()> {
        self.persist(&Registry::new()).await
    }

    async fn persist(&self, registry: &Registry) -> Result<()> {
        let encoded = registry
            .iter()
            .map(|(email, record)| StoredAuthor::encode(record).map(|raw| (email.as_str(), raw)))
            .collect::<Result<BTreeMap<&str, String>>>()?;

        let bytes =
            serde_json::to_vec(&encoded).map_err(|e| WhoamiError::Serialization(e.to_string()))?;

        log::debug!("persisting {} authors", registry.len());
        self.store.set(AUTHOR_DETAILS_KEY, bytes).await
    }
}
