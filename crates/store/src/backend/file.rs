use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Backend;
use crate::error::BackendError;

/// File-backed store: one JSON object mapping each key to its serialized value.
///
/// The whole document is rewritten on every batch. It goes to a sibling
/// `.tmp` file first, is synced, then renamed over the original, so a crash
/// leaves either the old document or the new one. Writers in other processes
/// are not coordinated with.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileBackend {
    /// Open the document at `path`, creating parent directories as needed.
    ///
    /// A missing or empty file opens as an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Io`] if the file or its directory cannot be
    /// accessed, or [`BackendError::Corrupt`] if the file is not a JSON object
    /// of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| BackendError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| BackendError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(BackendError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened store file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path) -> impl FnOnce(std::io::Error) -> BackendError {
        let path = path.to_path_buf();
        move |source| BackendError::Io { path, source }
    }

    /// Replace the document on disk with `entries`.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), BackendError> {
        let document = serde_json::to_vec_pretty(entries).map_err(|source| {
            BackendError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let temp = self.temp_path();
        let mut file = File::create(&temp).map_err(self.io_error(&temp))?;
        file.write_all(&document).map_err(self.io_error(&temp))?;
        file.sync_all().map_err(self.io_error(&temp))?;
        drop(file);

        fs::rename(&temp, &self.path).map_err(self.io_error(&self.path))
    }
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write_batch(&self, entries: &[(&str, String)]) -> Result<(), BackendError> {
        let mut stored = self.entries();
        let mut next = stored.clone();
        for (key, value) in entries {
            next.insert((*key).to_owned(), value.clone());
        }
        self.persist(&next)?;
        *stored = next;
        tracing::debug!(path = %self.path.display(), keys = entries.len(), "wrote batch");
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), BackendError> {
        let mut stored = self.entries();
        let mut next = stored.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next)?;
        *stored = next;
        Ok(())
    }

    fn flush(&self) -> Result<(), BackendError> {
        match File::open(&self.path) {
            Ok(file) => file.sync_all().map_err(self.io_error(&self.path)),
            // Nothing has been written yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(BackendError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
