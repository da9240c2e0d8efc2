//! Privacy-policy analysis for PolicyScan.
//!
//! This crate ties together sentence segmentation, keyword matching and
//! recommendation aggregation into a single pass (see [`pipeline::analyze`]).

pub mod matcher;
pub mod pipeline;
pub mod recommend;
pub mod rules;
pub mod segmenter;

pub use matcher::match_sentence;
pub use pipeline::analyze;
pub use recommend::aggregate;
pub use rules::{KeywordTable, RecommendationTable, RuleSet, TableIssue};
pub use segmenter::segment;
