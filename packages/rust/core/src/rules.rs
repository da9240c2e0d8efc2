//! Keyword and recommendation tables.
//!
//! The bundled tables are compiled in from `data/default_rules.toml`. A user
//! rules file with the same schema can extend or replace them.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use policyscan_shared::{Category, PolicyScanError, Result, RulesMode};

const DEFAULT_RULES: &str = include_str!("../data/default_rules.toml");

static BUNDLED: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::from_toml_str(DEFAULT_RULES).expect("bundled rules are valid")
});

// ---------------------------------------------------------------------------
// Rules file schema
// ---------------------------------------------------------------------------

/// Root of a rules TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
}

/// One `[[categories]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub id: String,
    /// Display name; falls back to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Ordered mapping from category to lowercase trigger keywords.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add keywords for a category, appending to an existing entry.
    ///
    /// Keywords are lowercased and deduplicated per category.
    pub fn insert<I, S>(&mut self, category: Category, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let idx = match self.entries.iter().position(|(c, _)| *c == category) {
            Some(idx) => idx,
            None => {
                self.entries.push((category, Vec::new()));
                self.entries.len() - 1
            }
        };

        let list = &mut self.entries[idx].1;
        for kw in keywords {
            let kw = kw.as_ref().to_lowercase();
            if !list.contains(&kw) {
                list.push(kw);
            }
        }
    }

    pub fn get(&self, category: &Category) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, kws)| kws.as_slice())
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, &[String])> {
        self.entries.iter().map(|(c, kws)| (c, kws.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter().map(|(c, _)| c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered mapping from category to suggested user actions.
#[derive(Debug, Clone, Default)]
pub struct RecommendationTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl RecommendationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add actions for a category, appending to an existing entry without duplicates.
    pub fn insert<I, S>(&mut self, category: Category, actions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let idx = match self.entries.iter().position(|(c, _)| *c == category) {
            Some(idx) => idx,
            None => {
                self.entries.push((category, Vec::new()));
                self.entries.len() - 1
            }
        };

        let list = &mut self.entries[idx].1;
        for action in actions {
            let action = action.into();
            if !list.contains(&action) {
                list.push(action);
            }
        }
    }

    pub fn get(&self, category: &Category) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, actions)| actions.as_slice())
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, &[String])> {
        self.entries.iter().map(|(c, a)| (c, a.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Consistency check
// ---------------------------------------------------------------------------

/// A mismatch between the keyword and recommendation tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableIssue {
    /// Category has keywords but no recommendations.
    MissingRecommendations(Category),
    /// Category has recommendations but is absent from the keyword table.
    OrphanRecommendations(Category),
    /// Category is declared with an empty keyword list and can never match.
    NoKeywords(Category),
}

impl std::fmt::Display for TableIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRecommendations(c) => {
                write!(f, "category '{}' has keywords but no recommendations", c.id)
            }
            Self::OrphanRecommendations(c) => {
                write!(f, "category '{}' has recommendations but no keywords entry", c.id)
            }
            Self::NoKeywords(c) => write!(f, "category '{}' has an empty keyword list", c.id),
        }
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// The keyword and recommendation tables used for one run.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub keywords: KeywordTable,
    pub recommendations: RecommendationTable,
}

impl RuleSet {
    /// The rules compiled into the binary.
    pub fn bundled() -> Self {
        BUNDLED.clone()
    }

    /// Parse a rules file from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RulesFile =
            toml::from_str(content).map_err(|e| PolicyScanError::parse(e.to_string()))?;
        Self::from_rules_file(file)
    }

    /// Load a rules file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PolicyScanError::io(path, e))?;
        let rules = Self::from_toml_str(&content).map_err(|e| match e {
            PolicyScanError::Parse { message } => {
                PolicyScanError::parse(format!("failed to parse {}: {message}", path.display()))
            }
            other => other,
        })?;
        debug!(?path, categories = rules.keywords.len(), "loaded rules file");
        Ok(rules)
    }

    /// Build tables from a parsed rules file, rejecting blank ids, blank
    /// keywords and duplicate ids.
    pub fn from_rules_file(file: RulesFile) -> Result<Self> {
        let mut rules = Self::default();
        let mut seen: HashSet<String> = HashSet::new();

        for rule in file.categories {
            let id = rule.id.trim();
            if id.is_empty() {
                return Err(PolicyScanError::validation("category with a blank id"));
            }
            if !seen.insert(id.to_string()) {
                return Err(PolicyScanError::validation(format!(
                    "category '{id}' is declared more than once"
                )));
            }
            if rule.keywords.iter().any(|kw| kw.trim().is_empty()) {
                return Err(PolicyScanError::validation(format!(
                    "category '{id}' has a blank keyword"
                )));
            }

            let label = rule
                .label
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| id.to_string());
            let category = Category::new(id, label);

            rules.keywords.insert(category.clone(), &rule.keywords);
            if !rule.recommendations.is_empty() {
                rules.recommendations.insert(category, rule.recommendations);
            }
        }

        Ok(rules)
    }

    /// Combine `other` into this rule set.
    pub fn merge(mut self, other: RuleSet, mode: RulesMode) -> Self {
        match mode {
            RulesMode::Replace => other,
            RulesMode::Extend => {
                for (category, kws) in other.keywords.iter() {
                    let category = self
                        .keywords
                        .categories()
                        .find(|c| *c == category)
                        .cloned()
                        .unwrap_or_else(|| category.clone());
                    self.keywords.insert(category, kws);
                }
                for (category, actions) in other.recommendations.iter() {
                    let category = self
                        .keywords
                        .categories()
                        .find(|c| *c == category)
                        .cloned()
                        .unwrap_or_else(|| category.clone());
                    self.recommendations
                        .insert(category, actions.iter().cloned());
                }
                self
            }
        }
    }

    /// Report every inconsistency between the two tables.
    pub fn validate(&self) -> Vec<TableIssue> {
        let mut issues = Vec::new();

        for (category, kws) in self.keywords.iter() {
            if kws.is_empty() {
                issues.push(TableIssue::NoKeywords(category.clone()));
            }
            if self.recommendations.get(category).is_none() {
                issues.push(TableIssue::MissingRecommendations(category.clone()));
            }
        }

        for (category, _) in self.recommendations.iter() {
            if self.keywords.get(category).is_none() {
                issues.push(TableIssue::OrphanRecommendations(category.clone()));
            }
        }

        issues
    }

    /// Serialize back to the rules file schema.
    pub fn to_rules_file(&self) -> RulesFile {
        let mut categories: Vec<CategoryRule> = self
            .keywords
            .iter()
            .map(|(category, kws)| CategoryRule {
                id: category.id.clone(),
                label: Some(category.label.clone()),
                keywords: kws.to_vec(),
                recommendations: self
                    .recommendations
                    .get(category)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default(),
            })
            .collect();

        for (category, actions) in self.recommendations.iter() {
            if self.keywords.get(category).is_none() {
                categories.push(CategoryRule {
                    id: category.id.clone(),
                    label: Some(category.label.clone()),
                    keywords: Vec::new(),
                    recommendations: actions.to_vec(),
                });
            }
        }

        RulesFile { categories }
    }
}
