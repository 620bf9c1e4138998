//! String-valued key-value persistence.
//!
//! The ticket store and session state each write a handful of well-known
//! keys (see [`keys`]). Two backends are provided:
//!
//! - [`MemoryStorage`]: an in-process map. Clones share the same map, so a
//!   ticket store and a session can be handed separate handles.
//! - [`FileStorage`]: a single JSON object on disk. Every operation is a
//!   full read (or read-modify-write) of the document under an advisory
//!   lock, so concurrent `tf` invocations never interleave a write.

use crate::error::StorageError;
use crate::lock::{DEFAULT_LOCK_TIMEOUT, StorageReadLock, StorageWriteLock};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

/// Well-known storage keys.
pub mod keys {
    /// JSON array of tickets, newest first.
    pub const TICKETS: &str = "tickets";
    /// `"true"` while logged in; absent otherwise.
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    /// Name of the last page navigated to.
    pub const CURRENT_PAGE: &str = "currentPage";
}

/// Durable string key-value store.
pub trait KeyValueStore {
    /// Read a key. Missing keys are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value could not be made durable.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Same as [`KeyValueStore::set`].
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-memory backend. Cloning yields another handle onto the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored entry.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// On-disk backend: one JSON object mapping keys to string values.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStorage {
    /// Storage document file name inside the project directory.
    pub const FILE_NAME: &'static str = "storage.json";

    /// Open (without touching disk) the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);
        Self {
            path,
            lock_path,
        }
    }

    /// The default document inside a `.ticketflow/` directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(doc) => Ok(doc),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "storage document is not valid JSON; treating it as empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_document(&self, doc: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_err = |source: io::Error| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        let body = serde_json::to_string_pretty(doc).map_err(|source| StorageError::Encode {
            key: "<document>".to_string(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut tmp_name = self.path.file_name().map(ToOwned::to_owned).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);
        fs::write(&tmp_path, body).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;
        Ok(())
    }

    fn modify(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let _lock = StorageWriteLock::acquire(&self.lock_path, DEFAULT_LOCK_TIMEOUT)?;
        let mut doc = self.read_document()?;
        f(&mut doc);
        self.write_document(&doc)
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _lock = StorageReadLock::acquire(&self.lock_path, DEFAULT_LOCK_TIMEOUT)?;
        Ok(self.read_document()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        debug!(key, bytes = value.len(), "storage set");
        self.modify(|doc| {
            doc.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        debug!(key, "storage remove");
        self.modify(|doc| {
            doc.remove(key);
        })
    }
}
