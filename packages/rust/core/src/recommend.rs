//! Recommendation aggregation.

use std::collections::HashSet;

use policyscan_shared::Category;

use crate::rules::RecommendationTable;

/// Collect the actions for every matched category.
///
/// The table is walked in declaration order, so the output does not depend on
/// the order categories were matched in. Repeated action strings are kept
/// only at their first occurrence. Matched categories without a table entry
/// contribute nothing.
pub fn aggregate(matched: &[Category], table: &RecommendationTable) -> Vec<String> {
    let matched: HashSet<&Category> = matched.iter().collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut actions = Vec::new();

    for (category, recs) in table.iter() {
        if !matched.contains(category) {
            continue;
        }
        for rec in recs {
            if seen.insert(rec.as_str()) {
                actions.push(rec.clone());
            }
        }
    }

    actions
}
