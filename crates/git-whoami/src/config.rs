//! # Host settings — `config.toml`
//!
//! ```toml
//! [display]
//! mode = "full"      # full | name | email | domain
//!
//! [git]
//! scope = "local"    # local | global | system
//! ```
//!
//! Every section and field is defaulted, so a missing or empty file is the
//! default configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::DisplayMode;
use crate::error::{Result, WhoamiError};
use crate::git::ConfigScope;

/// Top-level settings stored in `config.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub git: GitSettings,
}

/// How the current identity is rendered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub mode: DisplayMode,
}

/// Where switched identities are written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GitSettings {
    #[serde(default)]
    pub scope: ConfigScope,
}

impl Settings {
    /// The well-known filename for the settings file.
    pub fn filename() -> &'static str {
        "config.toml"
    }

    /// Builder method to set the display mode.
    pub fn with_display(mut self, mode: DisplayMode) -> Self {
        self.display.mode = mode;
        self
    }

    /// Builder method to set the git scope.
    pub fn with_scope(mut self, scope: ConfigScope) -> Self {
        self.git.scope = scope;
        self
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| WhoamiError::InvalidConfig(e.to_string()))
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| WhoamiError::Serialization(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
