//! End-to-end analysis: text → sentences → findings → recommendations.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use policyscan_shared::{AnalysisLimits, Category, Finding, RunResult};

use crate::matcher::match_sentence;
use crate::recommend::aggregate;
use crate::rules::RuleSet;
use crate::segmenter;

/// Run the full analysis over `text`.
///
/// 1. Segment into sentences (at most `limits.max_sentences`)
/// 2. Match each sentence against the keyword table
/// 3. Keep sentences with at least one category as findings
/// 4. Aggregate recommendations for the union of matched categories
///
/// Never fails: empty or adversarial text just yields an empty result.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn analyze(text: &str, rules: &RuleSet, limits: &AnalysisLimits) -> RunResult {
    let mut findings = Vec::new();
    let mut matched: HashSet<Category> = HashSet::new();
    let mut sentence_count = 0;
    let mut truncated = false;

    for sentence in segmenter::sentences(text) {
        if sentence_count == limits.max_sentences {
            truncated = true;
            warn!(
                max_sentences = limits.max_sentences,
                "sentence limit reached, remaining text not analysed"
            );
            break;
        }
        sentence_count += 1;

        let categories = match_sentence(&sentence.text, &rules.keywords);
        if categories.is_empty() {
            continue;
        }

        matched.extend(categories.iter().cloned());
        findings.push(Finding {
            sentence,
            categories,
        });
    }

    let categories: Vec<Category> = rules
        .keywords
        .categories()
        .filter(|c| matched.contains(*c))
        .cloned()
        .collect();

    let recommendations = aggregate(&categories, &rules.recommendations);

    debug!(
        sentences = sentence_count,
        findings = findings.len(),
        categories = categories.len(),
        recommendations = recommendations.len(),
        "analysis complete"
    );

    RunResult {
        findings,
        categories,
        recommendations,
        sentence_count,
        truncated,
    }
}
