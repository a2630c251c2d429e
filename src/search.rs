//! Filtering for the history drawer
//!
//! Narrows a list of history entries by free text, tag and time range.
//! Matching is case-insensitive and never reorders entries.

use crate::history::HistoryEntry;
use chrono::{DateTime, Utc};

/// Filter over history entries
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Text searched in title, input text and tags
    pub term: Option<String>,
    /// Exact tag the entry must carry
    pub tag: Option<String>,
    /// Optional time range filter (start, end), inclusive
    pub time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Maximum number of results to return
    pub limit: Option<usize>,
}

impl HistoryQuery {
    /// Create a query matching every entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term
    pub fn with_term<S: Into<String>>(mut self, term: S) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Require a tag
    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set time range filter
    pub fn with_time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.time_range = Some((start, end));
        self
    }

    /// Set result limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a single entry passes every filter
    pub fn matches<R>(&self, entry: &HistoryEntry<R>) -> bool {
        if let Some(tag) = &self.tag {
            if !entry.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }

        if let Some((start, end)) = &self.time_range {
            if entry.created_at < *start || entry.created_at > *end {
                return false;
            }
        }

        match &self.term {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                entry.title.to_lowercase().contains(&term)
                    || entry.input_text.to_lowercase().contains(&term)
                    || entry.tags.iter().any(|t| t.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }

    /// Apply the query, keeping the input order
    pub fn apply<R: Clone>(&self, entries: &[HistoryEntry<R>]) -> Vec<HistoryEntry<R>> {
        entries
            .iter()
            .filter(|entry| self.matches(entry))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryId;
    use chrono::Duration;
    use serde_json::{json, Value};

    fn entry(title: &str, input: &str, tags: &[&str], created_at: DateTime<Utc>) -> HistoryEntry<Value> {
        HistoryEntry {
            id: EntryId::generate(),
            created_at,
            title: title.to_string(),
            input_text: input.to_string(),
            analysis_result: json!({}),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn create_test_entries() -> Vec<HistoryEntry<Value>> {
        let now = Utc::now();
        vec![
            entry("Detoks çayı", "Detoks çayı ile zayıflayın", &["health"], now),
            entry("Otel fırsatı", "Antalya otel kampanyası", &["travel"], now - Duration::days(1)),
            entry("Spor ve diyet", "Spor salonu + diyet programı", &["health", "sport"], now - Duration::days(3)),
        ]
    }

    #[test]
    fn test_empty_query_matches_all() {
        let entries = create_test_entries();
        assert_eq!(HistoryQuery::new().apply(&entries).len(), 3);
    }

    #[test]
    fn test_term_is_case_insensitive() {
        let entries = create_test_entries();
        let results = HistoryQuery::new().with_term("ANTALYA").apply(&entries);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Otel fırsatı");
    }

    #[test]
    fn test_term_matches_tags() {
        let entries = create_test_entries();
        let results = HistoryQuery::new().with_term("sport").apply(&entries);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_tag_filter_keeps_order() {
        let entries = create_test_entries();
        let results = HistoryQuery::new().with_tag("health").apply(&entries);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Detoks çayı");
        assert_eq!(results[1].title, "Spor ve diyet");
    }

    #[test]
    fn test_time_range_and_limit() {
        let entries = create_test_entries();
        let now = Utc::now();

        let recent = HistoryQuery::new()
            .with_time_range(now - Duration::days(2), now + Duration::minutes(1))
            .apply(&entries);
        assert_eq!(recent.len(), 2);

        let limited = HistoryQuery::new().limit(1).apply(&entries);
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].title, "Detoks çayı");
    }
}
