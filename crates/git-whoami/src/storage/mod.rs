//! Persistent key/value storage for the author directory.
//!
//! The directory never touches disk itself. It reads and writes one opaque
//! byte value under one string key through a [`KeyValueStore`], which the
//! host injects.
//!
//! # Modules
//!
//! - [`memory_store`] — process-local store for tests and embedding.
//! - [`file_store`] — one file per key under a base directory.

pub mod file_store;
pub mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use std::future::Future;

use crate::error::Result;

/// Async key/value byte store supplied by the host.
///
/// `try_get` distinguishes a missing slot (`Ok(None)`) from one that exists
/// but cannot be read (`Err`). `get` folds both into `None` for callers that
/// only display data. `set` replaces the slot; last write wins.
pub trait KeyValueStore {
    fn try_get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>>;

    fn set(&self, key: &str, value: Vec<u8>) -> impl Future<Output = Result<()>>;

    fn get(&self, key: &str) -> impl Future<Output = Option<Vec<u8>>> {
        async move {
            match self.try_get(key).await {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("treating unreadable store slot {key:?} as absent: {e}");
                    None
                }
            }
        }
    }
}
