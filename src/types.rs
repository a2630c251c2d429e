//! Type definitions for eza-history
//!
//! This module provides type-safe wrappers around primitive types
//! to prevent accidental misuse of entry ids and storage keys.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use uuid::Uuid;

/// Longest storage key accepted by the media
pub const MAX_STORAGE_KEY_LEN: usize = 128;

/// A type-safe wrapper for history entry ids
///
/// Ids are UUID v4 strings generated when an entry is created. Ids read back
/// from storage are kept verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Create an EntryId from an existing string
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get a reference to the inner String
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for EntryId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A validated key in a storage medium
///
/// Keys double as file names for the file medium, so they are restricted to
/// ASCII alphanumerics, `.`, `_` and `-`, and may not start with a dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey(String);

impl StorageKey {
    /// Validate and wrap a key
    pub fn new<S: Into<String>>(key: S) -> Result<Self> {
        let key = key.into();
        let valid = !key.is_empty()
            && key.len() <= MAX_STORAGE_KEY_LEN
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

        if valid {
            Ok(Self(key))
        } else {
            Err(Error::InvalidStorageKey { key })
        }
    }

    /// Wrap a compile-time key without validation
    pub(crate) fn from_static(key: &'static str) -> Self {
        Self(key.to_string())
    }

    /// Get a reference to the inner key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StorageKey {
    type Error = Error;

    fn try_from(key: String) -> Result<Self> {
        Self::new(key)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_generate_is_unique() {
        let a = EntryId::generate();
        let b = EntryId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_entry_id_conversions() {
        let id: EntryId = "entry-1".into();
        assert_eq!(id.as_str(), "entry-1");
        let str_ref: &str = id.as_ref();
        assert_eq!(str_ref, "entry-1");
        let raw: String = id.into();
        assert_eq!(raw, "entry-1");
    }

    #[test]
    fn test_entry_id_serializes_as_plain_string() {
        let id = EntryId::new("abc".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    #[test]
    fn test_storage_key_validation() {
        assert!(StorageKey::new("eza_analysis_history").is_ok());
        assert!(StorageKey::new("eza.history-v1").is_ok());
        assert!(StorageKey::new("").is_err());
        assert!(StorageKey::new("../etc/passwd").is_err());
        assert!(StorageKey::new(".hidden").is_err());
        assert!(StorageKey::new("with space").is_err());
        assert!(StorageKey::new("k".repeat(MAX_STORAGE_KEY_LEN + 1)).is_err());
    }

    #[test]
    fn test_storage_key_deserialize_rejects_invalid() {
        let ok: std::result::Result<StorageKey, _> = serde_json::from_str("\"history\"");
        assert!(ok.is_ok());
        let bad: std::result::Result<StorageKey, _> = serde_json::from_str("\"a/b\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_display_implementations() {
        let id = EntryId::new("test-uuid".to_string());
        assert_eq!(format!("{}", id), "test-uuid");

        let key = StorageKey::new("history").unwrap();
        assert_eq!(format!("{}", key), "history");
    }
}
