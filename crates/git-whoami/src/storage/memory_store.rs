use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Result, WhoamiError};
use crate::storage::KeyValueStore;

/// In-memory KeyValueStore for testing and embedding.
///
/// Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot directly, bypassing the async interface.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.into(), value.into());
        }
        self
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    async fn try_get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| WhoamiError::Storage("memory store lock poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| WhoamiError::Storage("memory store lock poisoned".to_string()))?;
        slots.insert(key.to_string(), value);
        Ok(())
    }
}
