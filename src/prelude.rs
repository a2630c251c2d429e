//! Prelude module for eza-history
//!
//! This module re-exports commonly used types and traits to reduce
//! boilerplate imports for store consumers.
//!
//! # Usage
//!
//! ```rust
//! use eza_history::prelude::*;
//! ```

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::history::{AnalysisPayload, HistoryEntry, HistoryStore};
pub use crate::medium::StorageMedium;
pub use crate::types::{EntryId, StorageKey};

// Re-export commonly used external types
pub use chrono::{DateTime, Utc};
