//! Error types for git-whoami.
//!
//! Only failures the caller can act on are errors. Undecodable stored
//! entries, unknown emails and malformed display text are recovered where
//! they occur and never show up here.

/// Error types covering store, git and configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum WhoamiError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid display mode: {0} (expected full, name, email or domain)")]
    InvalidDisplayMode(String),

    #[error("Invalid config scope: {0} (expected local, global or system)")]
    InvalidScope(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, WhoamiError>;
