//! Per-entry stored format.
//!
//! Each registry entry is persisted as a string. Current releases write the
//! JSON encoding of an [`AuthorRecord`]; the first releases wrote the bare
//! display name. Both decode here, entry by entry:
//!
//! ```json
//! {
//!     "jane@x.com": "{\"name\":\"Jane Doe\",\"email\":\"jane@x.com\"}",
//!     "joe@x.com": "Joe Bloggs"
//! }
//! ```

use serde_json::Value;

use crate::author::AuthorRecord;
use crate::error::{Result, WhoamiError};

/// One decoded registry entry, before it is bound to its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredAuthor {
    /// A structured record.
    Structured(AuthorRecord),
    /// A bare display name from the legacy format.
    Legacy(String),
}

impl StoredAuthor {
    /// Decode a stored string value.
    ///
    /// Anything that is not a JSON object describing a record is a legacy
    /// bare name.
    pub fn decode_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => Self::from_object(value, raw),
            _ => Self::Legacy(raw.to_string()),
        }
    }

    /// Decode an entry of the outer stored mapping.
    ///
    /// Old hosts occasionally merged records into the slot as objects
    /// rather than encoded strings, so objects are accepted directly.
    pub fn decode_value(value: Value) -> Self {
        match value {
            Value::String(raw) => Self::decode_str(&raw),
            Value::Object(_) => {
                let text = value.to_string();
                Self::from_object(value, &text)
            }
            other => Self::Legacy(other.to_string()),
        }
    }

    fn from_object(value: Value, raw: &str) -> Self {
        match serde_json::from_value::<AuthorRecord>(value) {
            Ok(record) => Self::Structured(record),
            Err(_) => Self::Legacy(raw.to_string()),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Bind the entry to its registry key. The key always wins over an
    /// embedded email.
    pub fn into_record(self, key: &str) -> AuthorRecord {
        match self {
            Self::Structured(mut record) => {
                if !record.email.is_empty() && record.email != key {
                    log::warn!(
                        "stored author under {key} embeds email {}; using the key",
                        record.email
                    );
                }
                record.email = key.to_string();
                record
            }
            Self::Legacy(name) => AuthorRecord {
                name: Some(name),
                email: key.to_string(),
                private_key_path: None,
            },
        }
    }

    /// Structured encoding written for every entry.
    pub fn encode(record: &AuthorRecord) -> Result<String> {
        serde_json::to_string(record).map_err(|e| WhoamiError::Serialization(e.to_string()))
    }
}
