//! Keyword-presence category matching.
//!
//! A category matches a sentence when any of its keywords occurs as a
//! case-insensitive substring. There is no word-boundary check, stemming or
//! negation handling: "we do not sell your data" still matches
//! `selling_data`, and "sale" matches inside "wholesale".

use policyscan_shared::Category;

use crate::rules::KeywordTable;

/// Categories whose keywords occur in `sentence`, in table declaration order.
///
/// The result has set semantics: each category appears at most once.
pub fn match_sentence(sentence: &str, table: &KeywordTable) -> Vec<Category> {
    let lowered = sentence.to_lowercase();

    table
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw.as_str())))
        .map(|(category, _)| category.clone())
        .collect()
}
