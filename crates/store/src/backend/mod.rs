//! Key-value backends.
//!
//! A backend is a flat map from key to serialized string, the same contract
//! as browser local storage, plus one addition: a batch of writes lands
//! all-or-nothing. The [`Store`](crate::Store) builds typed snapshots on top.
//!
//! - [`MemoryBackend`] - in-process map, for tests and throwaway sessions
//! - [`FileBackend`] - a single JSON document on disk, replaced atomically

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::error::BackendError;

/// Flat string key-value storage.
pub trait Backend: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store every entry, replacing existing values.
    ///
    /// Either all entries are written or none are.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; nothing was stored in that case.
    fn write_batch(&self, entries: &[(&str, String)]) -> Result<(), BackendError>;

    /// Remove the given keys. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn remove(&self, keys: &[&str]) -> Result<(), BackendError>;

    /// Make sure everything written so far is durable.
    ///
    /// # Errors
    ///
    /// Returns an error if syncing the underlying storage fails.
    fn flush(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
