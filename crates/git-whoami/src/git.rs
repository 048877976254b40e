//! Git configuration collaborator.
//!
//! The directory does not read or write git configuration itself. A host
//! implements [`GitIdentity`] (the CLI does it by spawning `git config`) and
//! the [`switcher`](crate::switcher) drives it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::author::{AuthorRecord, Registry};
use crate::error::{Result, WhoamiError};

/// Git config keys touched when saving an identity.
pub const USER_NAME: &str = "user.name";
pub const USER_EMAIL: &str = "user.email";
pub const USER_SIGNING_KEY: &str = "user.signingkey";
pub const GPG_FORMAT: &str = "gpg.format";
pub const COMMIT_GPG_SIGN: &str = "commit.gpgsign";

/// Which git configuration file an identity is written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigScope {
    #[default]
    Local,
    Global,
    System,
}

impl ConfigScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Global => "global",
            Self::System => "system",
        }
    }

    /// The `git config` flag selecting this scope.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Local => "--local",
            Self::Global => "--global",
            Self::System => "--system",
        }
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigScope {
    type Err = WhoamiError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "global" => Ok(Self::Global),
            "system" => Ok(Self::System),
            _ => Err(WhoamiError::InvalidScope(s.to_string())),
        }
    }
}

/// Reads and writes the commit identity in git configuration.
pub trait GitIdentity {
    /// The effective identity (`user.name`, `user.email`, `user.signingkey`).
    fn current_author(&self) -> impl std::future::Future<Output = Result<AuthorRecord>>;

    /// One identity per configuration file that sets both name and email.
    fn available_authors(&self) -> impl std::future::Future<Output = Result<Registry>>;

    /// Write `record` to `scope`.
    ///
    /// Implementations set `user.email` and `user.name` when present. With a
    /// signing key they also set `user.signingkey`, `gpg.format=ssh` and
    /// `commit.gpgsign=true`; without one they unset those keys.
    fn save(
        &self,
        record: &AuthorRecord,
        scope: ConfigScope,
    ) -> impl std::future::Future<Output = Result<()>>;
}
