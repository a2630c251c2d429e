//! Configuration management for eza-history
//!
//! This module handles loading, validating, and managing configuration
//! for the history store: the storage key and backend, the history bound,
//! title derivation settings and the tag rules.

use crate::error::{Error, Result};
use crate::tags::{IssueRule, KeywordRule, DEFAULT_MAX_TAGS};
use crate::types::StorageKey;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".eza-history.json";

/// Default storage key for the history blob
pub const DEFAULT_STORAGE_KEY: &str = "eza_analysis_history";

/// Default maximum number of history entries to keep
pub const DEFAULT_MAX_ENTRIES: usize = 20;

/// Upper limit accepted for `max_entries`
pub const MAX_ENTRIES_LIMIT: usize = 500;

/// Default title budget in characters
pub const DEFAULT_TITLE_MAX_CHARS: usize = 50;

/// Title used when the input's first line is blank
pub const DEFAULT_TITLE: &str = "Analysis";

/// Which storage medium backs the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One JSON file per key in the data directory
    File,
    /// A SQLite database in the data directory
    Sqlite,
    /// Process memory only, nothing survives exit
    Memory,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key under which the whole history is stored
    pub storage_key: StorageKey,

    /// Maximum number of history entries to keep
    pub max_entries: usize,

    /// Title budget in characters before truncation
    pub title_max_chars: usize,

    /// Title used when the input has no usable first line
    pub default_title: String,

    /// Storage backend
    pub backend: BackendKind,

    /// Directory holding the file or SQLite medium
    pub data_dir: PathBuf,

    /// Tag derivation configuration
    pub tags: TagConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Configuration for tag derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Whether to use the built-in keyword table and issue rules
    pub use_builtin_rules: bool,

    /// Maximum number of tags per entry
    pub max_tags: usize,

    /// Extra keyword rules, scanned after the built-ins
    pub custom_keywords: Vec<KeywordRule>,

    /// Extra issue rules (regex over issue identifiers)
    pub custom_issue_rules: Vec<IssueRule>,
}

/// Configuration for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            max_entries: DEFAULT_MAX_ENTRIES,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            default_title: DEFAULT_TITLE.to_string(),
            backend: BackendKind::File,
            data_dir: crate::default_data_dir(),
            tags: TagConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            use_builtin_rules: true,
            max_tags: DEFAULT_MAX_TAGS,
            custom_keywords: Vec::new(),
            custom_issue_rules: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

fn default_storage_key() -> StorageKey {
    StorageKey::from_static(DEFAULT_STORAGE_KEY)
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config = Self::read_from_path(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file without validating it
    pub fn read_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
        Ok(home.join(DEFAULT_CONFIG_FILE))
    }

    /// Database file used by the SQLite backend
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join(crate::database::DEFAULT_DB_FILE)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 || self.max_entries > MAX_ENTRIES_LIMIT {
            return Err(Error::config_validation(
                "max_entries".to_string(),
                format!("must be between 1 and {}", MAX_ENTRIES_LIMIT),
            ));
        }

        if self.title_max_chars == 0 {
            return Err(Error::config_validation(
                "title_max_chars",
                "must be greater than 0",
            ));
        }

        if self.default_title.trim().is_empty() {
            return Err(Error::config_validation(
                "default_title",
                "must not be blank",
            ));
        }

        if self.tags.max_tags == 0 {
            return Err(Error::config_validation(
                "tags.max_tags",
                "must be greater than 0",
            ));
        }

        for rule in &self.tags.custom_keywords {
            if rule.keyword.trim().is_empty() || rule.tag.trim().is_empty() {
                return Err(Error::config_validation(
                    "tags.custom_keywords",
                    "keyword and tag must not be blank",
                ));
            }
        }

        for rule in &self.tags.custom_issue_rules {
            Regex::new(&rule.pattern).map_err(|_| {
                Error::config_validation(
                    "tags.custom_issue_rules".to_string(),
                    format!("invalid pattern: {}", rule.pattern),
                )
            })?;
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config_validation(
                    "logging.level",
                    "must be one of: trace, debug, info, warn, error",
                ));
            }
        }

        Ok(())
    }
}
