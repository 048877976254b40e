//! Identity switching workflow.
//!
//! [`AuthorSwitcher`] ties the [`AuthorDirectory`] to a [`GitIdentity`]
//! collaborator: it seeds the directory from git on start, lists the saved
//! identities as display lines, and applies a user's choice to both git and
//! the directory. Bad input never errors; it comes back as a
//! [`SwitchOutcome`] variant and nothing is written.

use crate::author::{AuthorPatch, AuthorRecord};
use crate::codec::{self, DisplayMode, NOT_AVAILABLE};
use crate::directory::AuthorDirectory;
use crate::error::Result;
use crate::git::{ConfigScope, GitIdentity};
use crate::storage::KeyValueStore;

/// Choice offered ahead of the saved identities for creating a new one.
pub const LABEL_ADD_NEW: &str = "Add new";

/// Result of a select or add request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The identity was written to git and merged into the directory.
    Switched(AuthorRecord),
    /// The display text could not be parsed, or a name or email given to
    /// `add` contains `<` or `>`.
    Malformed,
    /// No identity is saved under the requested email.
    NotFound,
    /// Name or email missing; nothing was stored.
    Incomplete,
}

impl SwitchOutcome {
    pub fn switched(&self) -> Option<&AuthorRecord> {
        match self {
            Self::Switched(record) => Some(record),
            _ => None,
        }
    }
}

/// Applies identity switches to git and the author directory.
pub struct AuthorSwitcher<S: KeyValueStore, G: GitIdentity> {
    directory: AuthorDirectory<S>,
    git: G,
    scope: ConfigScope,
}

impl<S: KeyValueStore, G: GitIdentity> AuthorSwitcher<S, G> {
    pub fn new(directory: AuthorDirectory<S>, git: G) -> Self {
        Self {
            directory,
            git,
            scope: ConfigScope::default(),
        }
    }

    /// Builder method to set the scope identities are saved to.
    pub fn with_scope(mut self, scope: ConfigScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn directory(&self) -> &AuthorDirectory<S> {
        &self.directory
    }

    pub fn git(&self) -> &G {
        &self.git
    }

    /// Merge every identity git knows about into the directory and return
    /// the one currently in effect.
    pub async fn sync_from_git(&self) -> Result<AuthorRecord> {
        let current = self.git.current_author().await?;
        let available = self.git.available_authors().await?;

        log::debug!("syncing {} authors from git configuration", available.len());
        self.directory
            .update(
                available
                    .into_iter()
                    .map(|(email, record)| (email, AuthorPatch::from(record))),
            )
            .await?;

        Ok(current)
    }

    /// The lines offered to the user: [`LABEL_ADD_NEW`] first, then every
    /// usable saved identity in `Name <email>` form.
    pub async fn choices(&self) -> Vec<String> {
        let saved = self.directory.get_all().await;
        std::iter::once(LABEL_ADD_NEW.to_string())
            .chain(
                saved
                    .values()
                    .filter(|record| record.is_usable())
                    .map(|record| codec::encode(record, DisplayMode::Full)),
            )
            .collect()
    }

    /// Switch to the identity named by a chosen display line.
    ///
    /// The saved record for the parsed email supplies the signing key, so a
    /// switch restores the full identity rather than just name and email.
    pub async fn select(&self, text: &str) -> Result<SwitchOutcome> {
        let chosen = codec::decode(text);
        if !chosen.is_selection() {
            log::debug!("ignoring unparseable selection {text:?}");
            return Ok(SwitchOutcome::Malformed);
        }

        let mut record = self
            .directory
            .get_by_email(&chosen.email)
            .await
            .unwrap_or_else(|| AuthorRecord {
                email: chosen.email.clone(),
                ..Default::default()
            });
        if !chosen.name.is_empty() && chosen.name != NOT_AVAILABLE {
            record.name = Some(chosen.name);
        }

        self.apply(record).await
    }

    /// Switch to the identity saved under `email`.
    pub async fn select_email(&self, email: &str) -> Result<SwitchOutcome> {
        match self.directory.get_by_email(email.trim()).await {
            Some(record) => self.apply(record).await,
            None => Ok(SwitchOutcome::NotFound),
        }
    }

    /// Create (or overwrite) an identity from user input and switch to it.
    pub async fn add(
        &self,
        name: &str,
        email: &str,
        private_key_path: Option<&str>,
    ) -> Result<SwitchOutcome> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() || email == NOT_AVAILABLE {
            return Ok(SwitchOutcome::Incomplete);
        }
        if [name, email].iter().any(|s| s.contains(|c: char| c == '<' || c == '>')) {
            return Ok(SwitchOutcome::Malformed);
        }

        let mut record = AuthorRecord::new(name, email);
        if let Some(path) = private_key_path.map(str::trim).filter(|p| !p.is_empty()) {
            record = record.with_private_key(path);
        }

        self.git.save(&record, self.scope).await?;

        let mut patch = AuthorPatch::from(&record);
        if record.signing_key().is_none() {
            let stored_key = self
                .directory
                .get_by_email(email)
                .await
                .and_then(|saved| saved.signing_key().map(str::to_string));
            if stored_key.is_some() {
                // The saved entry signs; the new one must not.
                patch = patch.private_key_path("");
            }
        }
        self.directory.update([(email, patch)]).await?;

        log::info!("switched to {}", codec::encode(&record, DisplayMode::Full));
        Ok(SwitchOutcome::Switched(record))
    }

    /// Empty the directory, then re-seed it with the current git identity
    /// when that identity is usable.
    pub async fn clean(&self) -> Result<Option<AuthorRecord>> {
        self.directory.reset().await?;

        let current = self.git.current_author().await?;
        if !current.is_usable() {
            log::warn!("current git identity is incomplete; directory left empty");
            return Ok(None);
        }
        self.directory.update_author(&current).await?;
        Ok(Some(current))
    }

    /// The current git identity rendered in `mode`.
    pub async fn status(&self, mode: DisplayMode) -> Result<String> {
        let current = self.git.current_author().await?;
        Ok(codec::encode(&current, mode))
    }

    async fn apply(&self, record: AuthorRecord) -> Result<SwitchOutcome> {
        if !record.is_usable() {
            return Ok(SwitchOutcome::Incomplete);
        }

        self.git.save(&record, self.scope).await?;
        self.directory.update_author(&record).await?;

        log::info!("switched to {}", codec::encode(&record, DisplayMode::Full));
        Ok(SwitchOutcome::Switched(record))
    }
}
