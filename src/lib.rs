//! eza-history - client-local history of EZA content analyses
//!
//! This library provides functionality for:
//! - Recording each finished analysis (input text + backend result) in a
//!   bounded, newest-first log
//! - Persisting that log as one JSON blob in a pluggable key-value medium
//!   (memory, files, SQLite)
//! - Deriving titles and heuristic topic tags for each entry
//! - Listing, looking up, filtering, deleting and clearing past analyses
//!
//! # Examples
//!
//! ```rust
//! use eza_history::{HistoryStore, MemoryMedium};
//! use serde_json::json;
//!
//! let mut store: HistoryStore<MemoryMedium> = HistoryStore::with_defaults(MemoryMedium::new())?;
//! let entry = store
//!     .save_analysis(&json!({ "issues": ["health_risk"] }), "Detox tea melts fat!")
//!     .expect("memory medium accepts the write");
//! assert_eq!(store.get_history()[0].id, entry.id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::PathBuf;

pub mod browse_tui;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod history;
pub mod medium;
pub mod prelude;
pub mod search;
pub mod tags;
pub mod types;

pub use config::{BackendKind, Config};
pub use database::SqliteMedium;
pub use error::{Error, Result};
pub use history::{AnalysisPayload, HistoryEntry, HistoryStore, LogState, StoreSettings};
pub use medium::{FileMedium, MemoryMedium, StorageMedium, UnavailableMedium};
pub use search::HistoryQuery;
pub use tags::TagEngine;

/// Directory name used under the platform data directory
pub const DATA_DIR_NAME: &str = "eza-history";

/// Get the default data directory for file and SQLite media
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(home::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(DATA_DIR_NAME)
}

/// Open the storage medium selected by a configuration
pub fn open_medium(config: &Config) -> Result<Box<dyn StorageMedium>> {
    let medium: Box<dyn StorageMedium> = match config.backend {
        BackendKind::File => Box::new(FileMedium::new(&config.data_dir)?),
        BackendKind::Sqlite => Box::new(SqliteMedium::open(&config.sqlite_path())?),
        BackendKind::Memory => Box::new(MemoryMedium::new()),
    };
    Ok(medium)
}

/// Initialize a store with the configuration at the default location
pub fn init() -> Result<HistoryStore<Box<dyn StorageMedium>>> {
    let config = Config::load()?;
    init_with_config(&config)
}

/// Initialize a store with a custom configuration
pub fn init_with_config(config: &Config) -> Result<HistoryStore<Box<dyn StorageMedium>>> {
    HistoryStore::from_config(open_medium(config)?, config)
}
