//! Core domain types for a PolicyScan analysis run.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A named class of privacy concern (e.g. `tracking`, `data_sharing`).
///
/// Identity is the `id` alone; `label` is only used for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Stable snake_case identifier.
    pub id: String,
    /// Human-readable name, e.g. "Analytics & Tracking".
    pub label: String,
}

impl Category {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

// ---------------------------------------------------------------------------
// Sentence / Finding
// ---------------------------------------------------------------------------

/// One sentence produced by segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Zero-based ordinal among the emitted sentences.
    pub index: usize,
    /// Byte offset of the sentence's first character in the input text.
    pub offset: usize,
    /// Trimmed sentence text with internal whitespace collapsed to single spaces.
    pub text: String,
}

/// A sentence together with the categories it matched. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub sentence: Sentence,
    /// Matched categories in rules declaration order.
    pub categories: Vec<Category>,
}

// ---------------------------------------------------------------------------
// RunResult
// ---------------------------------------------------------------------------

/// Complete output of one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Flagged sentences in input order.
    pub findings: Vec<Finding>,
    /// Distinct categories across all findings, in rules declaration order.
    pub categories: Vec<Category>,
    /// Deduplicated recommended actions.
    pub recommendations: Vec<String>,
    /// Number of sentences that were analysed.
    pub sentence_count: usize,
    /// Set when the sentence cap cut the input short.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl RunResult {
    /// True when no sentence matched any category.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_identity_ignores_label() {
        let a = Category::new("tracking", "Analytics & Tracking");
        let b = Category::new("tracking", "Tracking");
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn category_displays_label() {
        let cat = Category::new("selling_data", "Data Selling");
        assert_eq!(cat.to_string(), "Data Selling");
    }

    #[test]
    fn empty_result_is_clean() {
        let result = RunResult::default();
        assert!(result.is_clean());
        assert_eq!(result.sentence_count, 0);
    }

    #[test]
    fn run_result_serialization_omits_untruncated_flag() {
        let result = RunResult {
            findings: vec![Finding {
                sentence: Sentence {
                    index: 0,
                    offset: 0,
                    text: "We sell data.".into(),
                },
                categories: vec![Category::new("selling_data", "Data Selling")],
            }],
            categories: vec![Category::new("selling_data", "Data Selling")],
            recommendations: vec!["Opt out of the sale of personal information.".into()],
            sentence_count: 1,
            truncated: false,
        };

        let json = serde_json::to_string(&result).expect("serialize");
        assert!(!json.contains("truncated"));
        let parsed: RunResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, result);
    }
}
