//! History management for eza-history
//!
//! This module provides the analysis history store: a bounded, newest-first
//! log of past analyses persisted as one JSON array under a single key of a
//! `StorageMedium`. Every operation is infallible from the caller's point of
//! view. Storage failures are logged and turned into a no-op (writes) or an
//! empty result (reads).

use crate::config::Config;
use crate::error::Result;
use crate::medium::StorageMedium;
use crate::tags::TagEngine;
use crate::types::{EntryId, StorageKey};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Marker appended to truncated titles
pub const TITLE_ELLIPSIS: &str = "...";

/// Result fields scanned for issue identifiers
const ISSUE_FIELDS: &[&str] = &["issues", "flags", "risk_flags"];

/// Object keys naming an issue inside an issue list
const ISSUE_NAME_KEYS: &[&str] = &["type", "category", "code", "id"];

/// What the store needs to know about an analysis result
///
/// The payload is otherwise opaque: it is stored and returned verbatim.
pub trait AnalysisPayload {
    /// Whether the result carries anything worth saving
    fn is_present(&self) -> bool {
        true
    }

    /// Issue identifiers flagged by the analysis, used for tagging
    fn issues(&self) -> Vec<String> {
        Vec::new()
    }
}

impl AnalysisPayload for Value {
    fn is_present(&self) -> bool {
        !self.is_null()
    }

    fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for field in ISSUE_FIELDS {
            let Some(items) = self.get(field).and_then(Value::as_array) else {
                continue;
            };

            for item in items {
                match item {
                    Value::String(name) => issues.push(name.clone()),
                    Value::Object(map) => {
                        if let Some(name) = ISSUE_NAME_KEYS
                            .iter()
                            .find_map(|key| map.get(*key).and_then(Value::as_str))
                        {
                            issues.push(name.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        issues
    }
}

/// Represents one past analysis in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry<R> {
    /// Unique id, generated at creation
    pub id: EntryId,
    /// When the analysis was saved
    pub created_at: DateTime<Utc>,
    /// Short label derived from the first line of the input
    pub title: String,
    /// The full text that was analyzed
    pub input_text: String,
    /// The backend's result, stored verbatim
    pub analysis_result: R,
    /// Heuristic topic labels
    pub tags: Vec<String>,
}

/// Settings that shape the stored log
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub key: StorageKey,
    pub max_entries: usize,
    pub title_max_chars: usize,
    pub default_title: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Config::default().into()
    }
}

impl From<Config> for StoreSettings {
    fn from(config: Config) -> Self {
        Self {
            key: config.storage_key,
            max_entries: config.max_entries,
            title_max_chars: config.title_max_chars,
            default_title: config.default_title,
        }
    }
}

impl From<&Config> for StoreSettings {
    fn from(config: &Config) -> Self {
        config.clone().into()
    }
}

/// Statistics about the history
#[derive(Debug, Clone, Default)]
pub struct HistoryStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Oldest entry timestamp
    pub oldest_entry: Option<DateTime<Utc>>,
    /// Newest entry timestamp
    pub newest_entry: Option<DateTime<Utc>>,
    /// How many entries carry each tag
    pub tag_counts: HashMap<String, usize>,
}

/// State of the persisted blob, as seen by a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogState {
    /// Nothing stored under the key
    Missing,
    /// The blob decodes into this many entries
    Readable(usize),
    /// The blob is present but does not decode
    Unreadable { bytes: usize, reason: String },
    /// The medium itself failed
    Unavailable(String),
}

/// Derive an entry title from the input text
///
/// Takes the text before the first newline, trimmed. Longer than
/// `max_chars` characters gets cut to exactly `max_chars` plus
/// `TITLE_ELLIPSIS`; a blank first line gives `default_title`.
pub fn derive_title(input_text: &str, max_chars: usize, default_title: &str) -> String {
    let first_line = input_text.split('\n').next().unwrap_or_default().trim();

    if first_line.is_empty() {
        return default_title.to_string();
    }

    if first_line.chars().count() > max_chars {
        let truncated: String = first_line.chars().take(max_chars).collect();
        format!("{}{}", truncated, TITLE_ELLIPSIS)
    } else {
        first_line.to_string()
    }
}

/// Bounded, persisted analysis history
///
/// Each mutation reads the whole log, changes it in memory and writes it
/// back as one blob. There is no locking: two processes sharing a medium
/// and key can overwrite each other's changes.
pub struct HistoryStore<M, R = Value> {
    medium: M,
    settings: StoreSettings,
    tag_engine: TagEngine,
    _result: PhantomData<fn() -> R>,
}

impl<M, R> HistoryStore<M, R>
where
    M: StorageMedium,
    R: AnalysisPayload + Serialize + DeserializeOwned + Clone,
{
    /// Create a history store over `medium`
    pub fn new(medium: M, settings: StoreSettings, tag_engine: TagEngine) -> Self {
        Self {
            medium,
            settings,
            tag_engine,
            _result: PhantomData,
        }
    }

    /// Create a history store with the default key, bound and tag tables
    pub fn with_defaults(medium: M) -> Result<Self> {
        Ok(Self::new(medium, StoreSettings::default(), TagEngine::new()?))
    }

    /// Create a history store from a loaded configuration
    pub fn from_config(medium: M, config: &Config) -> Result<Self> {
        let tag_engine = TagEngine::with_config(
            config.tags.use_builtin_rules,
            config.tags.custom_keywords.clone(),
            config.tags.custom_issue_rules.clone(),
            config.tags.max_tags,
        )?;
        Ok(Self::new(medium, StoreSettings::from(config), tag_engine))
    }

    /// Record a finished analysis
    ///
    /// Returns the stored entry, or `None` when the result is absent or the
    /// log could not be read or persisted.
    pub fn save_analysis(&mut self, result: &R, input_text: &str) -> Option<HistoryEntry<R>> {
        self.save_analysis_at(result, input_text, Utc::now())
    }

    /// Record a finished analysis with a specific timestamp
    ///
    /// The timestamp is raised to the newest stored one if it is older, so
    /// the log stays ordered newest first.
    pub fn save_analysis_at(
        &mut self,
        result: &R,
        input_text: &str,
        timestamp: DateTime<Utc>,
    ) -> Option<HistoryEntry<R>> {
        if !result.is_present() {
            debug!("Skipping history save for an empty analysis result");
            return None;
        }

        let mut entries = match self.read_log() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    key = %self.settings.key,
                    error = %e,
                    category = e.category(),
                    "Could not read history, analysis not saved"
                );
                return None;
            }
        };

        let created_at = match entries.first() {
            Some(newest) if newest.created_at > timestamp => newest.created_at,
            _ => timestamp,
        };

        let entry = HistoryEntry {
            id: EntryId::generate(),
            created_at,
            title: derive_title(
                input_text,
                self.settings.title_max_chars,
                &self.settings.default_title,
            ),
            input_text: input_text.to_string(),
            analysis_result: result.clone(),
            tags: self.tag_engine.derive(input_text, &result.issues()),
        };

        entries.insert(0, entry.clone());
        entries.truncate(self.settings.max_entries);

        match self.write_log(&entries) {
            Ok(()) => {
                debug!(id = %entry.id, entries = entries.len(), "Saved analysis to history");
                Some(entry)
            }
            Err(e) => {
                warn!(
                    key = %self.settings.key,
                    error = %e,
                    category = e.category(),
                    "Could not persist history, analysis not saved"
                );
                None
            }
        }
    }

    /// All stored entries, newest first
    ///
    /// Missing, unreadable or unavailable storage all read as empty.
    #[must_use = "Query results should be used"]
    pub fn get_history(&self) -> Vec<HistoryEntry<R>> {
        self.read_log().unwrap_or_else(|e| {
            warn!(
                key = %self.settings.key,
                error = %e,
                category = e.category(),
                "Could not read history"
            );
            Vec::new()
        })
    }

    /// Look up one entry by id
    #[must_use = "Query results should be used"]
    pub fn get_history_entry(&self, id: &str) -> Option<HistoryEntry<R>> {
        self.get_history().into_iter().find(|entry| entry.id.as_str() == id)
    }

    /// Delete one entry by id
    ///
    /// Returns whether an entry was removed. An unknown id leaves storage
    /// untouched.
    pub fn delete_history_entry(&mut self, id: &str) -> bool {
        let mut entries = match self.read_log() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    key = %self.settings.key,
                    error = %e,
                    category = e.category(),
                    "Could not read history, nothing deleted"
                );
                return false;
            }
        };

        let before = entries.len();
        entries.retain(|entry| entry.id.as_str() != id);
        if entries.len() == before {
            debug!(id, "No history entry to delete");
            return false;
        }

        match self.write_log(&entries) {
            Ok(()) => {
                debug!(id, remaining = entries.len(), "Deleted history entry");
                true
            }
            Err(e) => {
                warn!(
                    key = %self.settings.key,
                    error = %e,
                    category = e.category(),
                    "Could not persist history after delete"
                );
                false
            }
        }
    }

    /// Remove the whole history
    pub fn clear_history(&mut self) {
        match self.medium.remove_item(&self.settings.key) {
            Ok(()) => debug!(key = %self.settings.key, "Cleared history"),
            Err(e) => warn!(
                key = %self.settings.key,
                error = %e,
                category = e.category(),
                "Could not clear history"
            ),
        }
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        let entries = self.get_history();
        let mut stats = HistoryStats {
            total_entries: entries.len(),
            oldest_entry: entries.iter().map(|e| e.created_at).min(),
            newest_entry: entries.iter().map(|e| e.created_at).max(),
            tag_counts: HashMap::new(),
        };

        for tag in entries.iter().flat_map(|e| e.tags.iter()) {
            *stats.tag_counts.entry(tag.clone()).or_insert(0) += 1;
        }

        stats
    }

    /// Report the state of the persisted blob without changing it
    pub fn inspect(&self) -> LogState {
        match self.medium.get_item(&self.settings.key) {
            Ok(None) => LogState::Missing,
            Ok(Some(blob)) => match serde_json::from_str::<Vec<HistoryEntry<R>>>(&blob) {
                Ok(entries) => LogState::Readable(entries.len()),
                Err(e) => LogState::Unreadable {
                    bytes: blob.len(),
                    reason: e.to_string(),
                },
            },
            Err(e) => LogState::Unavailable(e.to_string()),
        }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Read the stored log
    ///
    /// Medium failures are errors. An undecodable blob is logged and read
    /// as an empty log; it is left in storage.
    fn read_log(&self) -> Result<Vec<HistoryEntry<R>>> {
        let Some(blob) = self.medium.get_item(&self.settings.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&blob) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    key = %self.settings.key,
                    bytes = blob.len(),
                    error = %e,
                    "Discarding unreadable history data"
                );
                Ok(Vec::new())
            }
        }
    }

    fn write_log(&mut self, entries: &[HistoryEntry<R>]) -> Result<()> {
        let blob = serde_json::to_string(entries)?;
        self.medium.set_item(&self.settings.key, &blob)
    }
}
