//! Tag engine for eza-history
//!
//! Derives short topic labels for an analysis from its input text and the
//! issue identifiers the backend flagged. This is a keyword heuristic, not a
//! classifier: a tag is attached whenever one of its keywords occurs as a
//! substring of the lowercased text.

use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum number of tags attached to one entry
pub const DEFAULT_MAX_TAGS: usize = 5;

/// Built-in keyword table, scanned in order
///
/// Keywords are lowercase substrings; English and Turkish synonyms map to
/// the same canonical tag.
pub const BUILTIN_KEYWORDS: &[(&str, &str)] = &[
    // Health
    ("health", "health"),
    ("sağlık", "health"),
    ("saglik", "health"),
    ("detox", "health"),
    ("detoks", "health"),
    ("diyet", "health"),
    ("diet", "health"),
    ("zayıfla", "health"),
    ("vitamin", "health"),
    ("ilaç", "health"),
    ("medical", "health"),
    ("tıbbi", "health"),
    // Travel
    ("travel", "travel"),
    ("seyahat", "travel"),
    ("tatil", "travel"),
    ("hotel", "travel"),
    ("otel", "travel"),
    ("flight", "travel"),
    ("uçuş", "travel"),
    // Food
    ("food", "food"),
    ("yemek", "food"),
    ("gıda", "food"),
    ("recipe", "food"),
    ("tarif", "food"),
    ("restaurant", "food"),
    ("restoran", "food"),
    // Technology
    ("technology", "technology"),
    ("teknoloji", "technology"),
    ("software", "technology"),
    ("yazılım", "technology"),
    ("smartphone", "technology"),
    ("telefon", "technology"),
    ("yapay zeka", "technology"),
    // Education
    ("education", "education"),
    ("eğitim", "education"),
    ("school", "education"),
    ("okul", "education"),
    ("course", "education"),
    ("kurs", "education"),
    ("university", "education"),
    ("üniversite", "education"),
    // Fashion
    ("fashion", "fashion"),
    ("moda", "fashion"),
    ("clothing", "fashion"),
    ("giyim", "fashion"),
    ("kıyafet", "fashion"),
    // Sport
    ("sport", "sport"),
    ("spor", "sport"),
    ("fitness", "sport"),
    ("football", "sport"),
    ("futbol", "sport"),
    ("workout", "sport"),
    ("antrenman", "sport"),
    // Finance
    ("finance", "finance"),
    ("finans", "finance"),
    ("investment", "finance"),
    ("yatırım", "finance"),
    ("crypto", "finance"),
    ("kripto", "finance"),
    ("borsa", "finance"),
    ("kredi", "finance"),
    // Beauty
    ("beauty", "beauty"),
    ("güzellik", "beauty"),
    ("cosmetic", "beauty"),
    ("kozmetik", "beauty"),
    ("skincare", "beauty"),
    ("cilt", "beauty"),
    // Parenting
    ("parenting", "parenting"),
    ("baby", "parenting"),
    ("bebek", "parenting"),
    ("children", "parenting"),
    ("çocuk", "parenting"),
];

/// Built-in issue rules: issue identifier pattern and the tag it implies
pub const BUILTIN_ISSUE_RULES: &[(&str, &str)] = &[
    (r"(?i)health|medical|medicine", "health"),
    (r"(?i)financ|investment|crypto", "finance"),
    (r"(?i)child|minor", "parenting"),
];

/// A keyword substring and the tag it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub tag: String,
}

/// An issue-identifier regex and the tag it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRule {
    pub pattern: String,
    pub tag: String,
}

#[derive(Debug, Clone)]
struct CompiledIssueRule {
    regex: Regex,
    tag: String,
}

/// Keyword and issue-flag based tagger
#[derive(Debug, Clone)]
pub struct TagEngine {
    keywords: Vec<KeywordRule>,
    issue_rules: Vec<CompiledIssueRule>,
    max_tags: usize,
}

impl TagEngine {
    /// Create a tag engine with the built-in tables
    pub fn new() -> Result<Self> {
        Self::with_config(true, Vec::new(), Vec::new(), DEFAULT_MAX_TAGS)
    }

    /// Create a tag engine with custom configuration
    ///
    /// Custom rules are consulted after the built-in ones.
    pub fn with_config(
        use_builtin: bool,
        custom_keywords: Vec<KeywordRule>,
        custom_issue_rules: Vec<IssueRule>,
        max_tags: usize,
    ) -> Result<Self> {
        let mut keywords = Vec::new();
        let mut issue_rules = Vec::new();

        if use_builtin {
            keywords.extend(BUILTIN_KEYWORDS.iter().map(|(keyword, tag)| KeywordRule {
                keyword: keyword.to_string(),
                tag: tag.to_string(),
            }));
            for (pattern, tag) in BUILTIN_ISSUE_RULES {
                issue_rules.push(CompiledIssueRule {
                    regex: Regex::new(pattern)?,
                    tag: tag.to_string(),
                });
            }
        }

        keywords.extend(
            custom_keywords
                .into_iter()
                .filter(|rule| !rule.keyword.is_empty())
                .map(|rule| KeywordRule {
                    keyword: rule.keyword.to_lowercase(),
                    tag: rule.tag,
                }),
        );

        for rule in custom_issue_rules {
            issue_rules.push(CompiledIssueRule {
                regex: Regex::new(&rule.pattern)?,
                tag: rule.tag,
            });
        }

        Ok(Self {
            keywords,
            issue_rules,
            max_tags,
        })
    }

    /// Derive tags for an analysis
    ///
    /// Keyword hits come first in table order, then tags implied by the
    /// flagged issues. Duplicates are dropped and the list is capped at
    /// `max_tags`, keeping the earliest discoveries.
    pub fn derive(&self, input_text: &str, issues: &[String]) -> Vec<String> {
        let text = input_text.to_lowercase();
        let mut tags: Vec<String> = Vec::new();

        for rule in &self.keywords {
            if text.contains(&rule.keyword) && !tags.contains(&rule.tag) {
                tags.push(rule.tag.clone());
            }
        }

        for issue in issues {
            for rule in &self.issue_rules {
                if rule.regex.is_match(issue) && !tags.contains(&rule.tag) {
                    tags.push(rule.tag.clone());
                }
            }
        }

        tags.truncate(self.max_tags);
        tags
    }
}
