//! Display encoding of identities.
//!
//! Converts an [`AuthorRecord`] into the one-line strings shown to the user
//! (`Jane Doe <jane@example.com>` and its short forms) and parses a chosen
//! line back. Parsing never fails: unparseable text yields the `"N/A"`
//! sentinel, which callers must treat as "no valid selection".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::author::AuthorRecord;
use crate::error::WhoamiError;

/// Placeholder rendered for a missing field, and the decode failure sentinel.
pub const NOT_AVAILABLE: &str = "N/A";

/// Which form of an identity to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// `Name <email>`
    #[default]
    Full,
    /// The bare name.
    Name,
    /// The bare email.
    Email,
    /// The part of the email after the first `@`.
    Domain,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Name => "name",
            Self::Email => "email",
            Self::Domain => "domain",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = WhoamiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "domain" => Ok(Self::Domain),
            _ => Err(WhoamiError::InvalidDisplayMode(s.to_string())),
        }
    }
}

/// Name and email parsed from a display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayIdentity {
    pub name: String,
    pub email: String,
}

impl DisplayIdentity {
    /// The `{ "N/A", "N/A" }` value returned for unparseable text.
    pub fn not_available() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            email: NOT_AVAILABLE.to_string(),
        }
    }

    /// False for the decode failure sentinel.
    pub fn is_selection(&self) -> bool {
        !self.email.is_empty() && self.email != NOT_AVAILABLE
    }
}

/// Render `record` in the given mode.
pub fn encode(record: &AuthorRecord, mode: DisplayMode) -> String {
    let email = Some(record.email.as_str()).filter(|e| !e.is_empty());
    match mode {
        DisplayMode::Full => format!(
            "{} <{}>",
            record.name().unwrap_or(NOT_AVAILABLE),
            email.unwrap_or(NOT_AVAILABLE)
        ),
        DisplayMode::Name => record.name().unwrap_or(NOT_AVAILABLE).to_string(),
        DisplayMode::Email => email.unwrap_or(NOT_AVAILABLE).to_string(),
        DisplayMode::Domain => email
            .and_then(|e| e.split_once('@'))
            .map(|(_, domain)| domain)
            .filter(|d| !d.is_empty())
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
    }
}

/// Parse a line produced by `encode(_, DisplayMode::Full)`.
///
/// The name is everything before the first `<`, the email everything between
/// it and the next `>`. Both are trimmed.
pub fn decode(text: &str) -> DisplayIdentity {
    let Some((name, rest)) = text.split_once('<') else {
        return DisplayIdentity::not_available();
    };
    let Some((email, _)) = rest.split_once('>') else {
        return DisplayIdentity::not_available();
    };
    let email = email.trim();
    if email.is_empty() {
        return DisplayIdentity::not_available();
    }
    DisplayIdentity {
        name: name.trim().to_string(),
        email: email.to_string(),
    }
}
