//! Storage media for the history store
//!
//! This module defines the `StorageMedium` trait, a minimal string-keyed
//! store with get/set/remove, and the in-process, file-based and
//! unavailable implementations. The SQLite medium lives in `database`.

use crate::error::{Error, Result};
use crate::types::StorageKey;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Common interface for durable key-value storage
///
/// Values are opaque strings. Implementations overwrite whole values; there
/// is no append or partial update.
pub trait StorageMedium {
    /// Read the value stored under `key`
    ///
    /// Returns `Ok(None)` when nothing has been written under the key.
    #[must_use = "Stored values should be used"]
    fn get_item(&self, key: &StorageKey) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &StorageKey, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&mut self, key: &StorageKey) -> Result<()>;

    /// Short name used in status output and logs
    fn describe(&self) -> String;
}

impl<M: StorageMedium + ?Sized> StorageMedium for Box<M> {
    fn get_item(&self, key: &StorageKey) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &StorageKey, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &StorageKey) -> Result<()> {
        (**self).remove_item(key)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// In-process medium backed by a `HashMap`
///
/// An optional quota caps the total size of keys plus values in bytes,
/// the way browser storage does.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a medium that refuses writes past `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used, counting keys and values
    pub fn usage(&self) -> usize {
        self.items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StorageMedium for MemoryMedium {
    fn get_item(&self, key: &StorageKey) -> Result<Option<String>> {
        Ok(self.items.get(key.as_str()).cloned())
    }

    fn set_item(&mut self, key: &StorageKey, value: &str) -> Result<()> {
        if let Some(limit) = self.quota {
            let replaced = self
                .items
                .get(key.as_str())
                .map(|old| key.as_str().len() + old.len())
                .unwrap_or(0);
            let required = self.usage() - replaced + key.as_str().len() + value.len();
            if required > limit {
                return Err(Error::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    limit,
                });
            }
        }

        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &StorageKey) -> Result<()> {
        self.items.remove(key.as_str());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// File-based medium storing each key as `<key>.json` in a directory
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Open a medium rooted at `dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageMedium for FileMedium {
    fn get_item(&self, key: &StorageKey) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &StorageKey, value: &str) -> Result<()> {
        // Write beside the target and rename so readers never see half a blob
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &StorageKey) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        format!("file ({})", self.dir.display())
    }
}

/// Medium for contexts with no client storage at all
///
/// Every operation fails with `StorageUnavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableMedium;

impl StorageMedium for UnavailableMedium {
    fn get_item(&self, _key: &StorageKey) -> Result<Option<String>> {
        Err(Error::StorageUnavailable)
    }

    fn set_item(&mut self, _key: &StorageKey, _value: &str) -> Result<()> {
        Err(Error::StorageUnavailable)
    }

    fn remove_item(&mut self, _key: &StorageKey) -> Result<()> {
        Err(Error::StorageUnavailable)
    }

    fn describe(&self) -> String {
        "unavailable".to_string()
    }
}
