//! Filesystem-backed key/value store.
//!
//! Each key is persisted as one file under the base directory:
//!
//! ```text
//! {base_dir}/
//! └── {key}.json
//! ```
//!
//! Writes go to a sibling temporary file which is then renamed into place,
//! so a concurrent reader never sees a partial value.

use std::path::{Path, PathBuf};

use crate::error::{Result, WhoamiError};
use crate::storage::KeyValueStore;

const SLOT_EXTENSION: &str = "json";

/// Filesystem-backed KeyValueStore for the CLI host.
#[derive(Clone, Debug)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_dir`. The directory is created lazily
    /// on the first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file holding `key`, or `None` for keys that would escape
    /// the base directory.
    fn slot_path(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(|c: char| c == '/' || c == '\\' || c == '\0');
        valid.then(|| self.base_dir.join(format!("{key}.{SLOT_EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    async fn try_get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.slot_path(key) else {
            return Ok(None);
        };
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WhoamiError::Storage(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let path = self
            .slot_path(key)
            .ok_or_else(|| WhoamiError::Storage(format!("invalid store key: {key:?}")))?;
        write_atomic(&path, &value)?;
        log::debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Per-process temp name: concurrent writers never share a temp file.
    let tmp_path = path.with_extension(format!("json.{}.tmp", std::process::id()));
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, path)?;

    Ok(())
}
