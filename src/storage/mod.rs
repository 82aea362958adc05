//! String-keyed storage slots.
//!
//! The mood log is persisted into a single opaque slot of a key-value store.
//! [`KeyValueStore`] is the seam between the log and whatever backs it:
//! [`FileStore`] keeps one file per slot inside the data directory, and
//! [`MemoryStore`] keeps slots in memory and can be told to fail, which the
//! tests use to exercise the fail-soft paths.

use crate::constants::{STORAGE_FILE_EXTENSION, STORAGE_LOCK_EXTENSION};
use crate::errors::{AppError, AppResult, StorageError};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A store of string values addressed by string keys.
pub trait KeyValueStore {
    /// Reads a slot. `Ok(None)` means the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the whole content of a slot.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Copies the raw content of `key` into `target`, leaving `key` as is.
    ///
    /// A missing slot copies nothing.
    fn preserve(&mut self, key: &str, target: &str) -> Result<(), StorageError> {
        match self.get(key)? {
            Some(value) => self.set(target, &value),
            None => Ok(()),
        }
    }
}

/// Ensures the data directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns:
/// - `AppError::Config` if the provided path is not an absolute path
/// - `AppError::Io` if the directory creation fails
pub fn ensure_data_directory_exists(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions =
                fs::Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(data_dir, permissions).map_err(|e| {
                AppError::Io(io::Error::new(
                    e.kind(),
                    format!("Failed to set secure permissions on data directory: {}", e),
                ))
            })?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}

/// Slots stored as `<key>.json` files in one directory.
///
/// Every access holds an exclusive advisory lock on `<key>.lock`, and writes
/// go through a temporary file renamed over the slot, so a reader never sees
/// a half-written log and two processes never interleave writes to one slot.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

/// Releases the advisory lock when dropped.
struct SlotLock {
    file: File,
}

impl Drop for SlotLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for a relative path and `AppError::Io` if
    /// the directory cannot be created.
    pub fn open(root: &Path) -> AppResult<Self> {
        ensure_data_directory_exists(root)?;
        Ok(FileStore {
            root: root.to_path_buf(),
        })
    }

    /// Directory holding the slot files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, STORAGE_FILE_EXTENSION))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, STORAGE_LOCK_EXTENSION))
    }

    fn check_key(key: &str) -> io::Result<()> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if valid {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key '{}'", key),
            ))
        }
    }

    fn lock(&self, key: &str) -> Result<SlotLock, StorageError> {
        let lock_err = |source| StorageError::LockFailed {
            key: key.to_string(),
            source,
        };
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path(key))
            .map_err(lock_err)?;
        file.lock_exclusive().map_err(lock_err)?;
        Ok(SlotLock { file })
    }

    fn write_slot(&self, key: &str, value: &str) -> io::Result<()> {
        let mut temp = tempfile::NamedTempFile::new_in(&self.root)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions =
                fs::Permissions::from_mode(crate::constants::DEFAULT_FILE_PERMISSIONS);
            temp.as_file().set_permissions(permissions)?;
        }

        temp.persist(self.slot_path(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let read_err = |source| StorageError::ReadFailed {
            key: key.to_string(),
            source,
        };
        Self::check_key(key).map_err(read_err)?;
        let _lock = self.lock(key)?;

        match fs::read(self.slot_path(key)) {
            Ok(bytes) => {
                debug!("Read {} bytes from slot {}", bytes.len(), key);
                let content =
                    String::from_utf8(bytes).map_err(|source| StorageError::InvalidEncoding {
                        key: key.to_string(),
                        source,
                    })?;
                Ok(Some(content))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Slot {} does not exist yet", key);
                Ok(None)
            }
            Err(e) => Err(read_err(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_err = |source| StorageError::WriteFailed {
            key: key.to_string(),
            source,
        };
        Self::check_key(key).map_err(write_err)?;
        let _lock = self.lock(key)?;

        self.write_slot(key, value).map_err(write_err)?;
        debug!("Wrote {} bytes to slot {}", value.len(), key);
        Ok(())
    }

    /// Copies the slot file byte for byte, so content that is not valid
    /// UTF-8 survives too.
    fn preserve(&mut self, key: &str, target: &str) -> Result<(), StorageError> {
        let write_err = |source| StorageError::WriteFailed {
            key: target.to_string(),
            source,
        };
        Self::check_key(key).map_err(write_err)?;
        Self::check_key(target).map_err(write_err)?;
        let _lock = self.lock(key)?;

        match fs::copy(self.slot_path(key), self.slot_path(target)) {
            Ok(bytes) => {
                debug!("Preserved {} bytes of slot {} as {}", bytes, key, target);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(write_err(e)),
        }
    }
}

/// In-memory slots with injectable failures.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    fail_reads: bool,
    failing_writes: usize,
    writes: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one pre-filled slot.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.slots.insert(key.to_string(), value.to_string());
        store
    }

    /// Makes every subsequent read fail (or succeed again).
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Makes the next `count` writes fail.
    pub fn fail_next_writes(&mut self, count: usize) {
        self.failing_writes = count;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Raw content of a slot, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::ReadFailed {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "simulated read failure"),
            });
        }
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "simulated write failure"),
            });
        }
        self.slots.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
