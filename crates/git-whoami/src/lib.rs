//! git-whoami — saved git commit identities.
//!
//! Keeps a persisted directory of known author identities (name, email,
//! optional signing key), migrates entries written in the legacy bare-name
//! format, renders identities as one-line display strings, and drives the
//! switch between identities against a git configuration collaborator.

pub mod author;
pub mod codec;
pub mod config;
pub mod directory;
pub mod error;
pub mod git;
pub mod storage;
pub mod switcher;

// Re-export primary types
pub use author::{AuthorPatch, AuthorRecord, Registry};
pub use codec::{DisplayIdentity, DisplayMode, NOT_AVAILABLE};
pub use config::Settings;
pub use directory::{AuthorDirectory, StoredAuthor, AUTHOR_DETAILS_KEY};
pub use error::{Result, WhoamiError};
pub use git::{ConfigScope, GitIdentity};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use switcher::{AuthorSwitcher, SwitchOutcome, LABEL_ADD_NEW};
