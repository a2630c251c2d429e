//! Error handling for eza-history
//!
//! This module defines the error types used by the storage media, the
//! configuration layer and the CLI. The history store itself never hands
//! these to its callers; it logs them and falls back to a safe default.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for eza-history operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for eza-history operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Regex compilation failed
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No storage medium is available in this execution context
    #[error("Storage medium unavailable")]
    StorageUnavailable,

    /// A write would exceed the medium's capacity
    #[error("Storage quota exceeded for key {key}: {required} bytes needed, {limit} allowed")]
    QuotaExceeded {
        key: String,
        required: usize,
        limit: usize,
    },

    /// Storage key contains characters the media cannot represent
    #[error("Invalid storage key: {key}")]
    InvalidStorageKey { key: String },

    /// No history entry with the given id
    #[error("History entry not found: {id}")]
    EntryNotFound { id: String },

    /// Home directory could not be determined
    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid command line arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {field} - {reason}")]
    ConfigValidation { field: String, reason: String },
}

impl Error {
    /// Create an invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(message: S) -> Self {
        Error::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a config validation error
    pub fn config_validation<S: Into<String>>(field: S, reason: S) -> Self {
        Error::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an entry not found error
    pub fn entry_not_found<S: Into<String>>(id: S) -> Self {
        Error::EntryNotFound { id: id.into() }
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Regex(_) => "regex",
            Error::Json(_) => "json",
            Error::Database(_) => "database",
            Error::StorageUnavailable
            | Error::QuotaExceeded { .. }
            | Error::InvalidStorageKey { .. } => "storage",
            Error::EntryNotFound { .. } => "history",
            Error::HomeDirectoryNotFound => "system",
            Error::ConfigNotFound { .. } | Error::ConfigValidation { .. } => "config",
            Error::InvalidArguments { .. } => "arguments",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_error() {
        let err = Error::ConfigNotFound {
            path: PathBuf::from("/tmp/missing.json"),
        };
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /tmp/missing.json"
        );
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_invalid_arguments_error() {
        let err = Error::invalid_arguments("missing input text");
        assert_eq!(err.to_string(), "Invalid arguments: missing input text");
        assert_eq!(err.category(), "arguments");
    }

    #[test]
    fn test_config_validation_error() {
        let err = Error::config_validation("max_entries", "must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration validation failed: max_entries - must be positive"
        );
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_quota_exceeded() {
        let err = Error::QuotaExceeded {
            key: "eza_analysis_history".to_string(),
            required: 2048,
            limit: 1024,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded for key eza_analysis_history: 2048 bytes needed, 1024 allowed"
        );
        assert_eq!(err.category(), "storage");
    }

    #[test]
    fn test_storage_unavailable() {
        let err = Error::StorageUnavailable;
        assert_eq!(err.category(), "storage");
    }

    #[test]
    fn test_entry_not_found() {
        let err = Error::entry_not_found("abc");
        assert_eq!(err.to_string(), "History entry not found: abc");
        assert_eq!(err.category(), "history");
    }
}
