//! Shared types, error model, and configuration for PolicyScan.
//!
//! This crate is the foundation depended on by the other PolicyScan crates.
//! It provides:
//! - [`PolicyScanError`], the unified error type
//! - Domain types ([`Category`], [`Sentence`], [`Finding`], [`RunResult`])
//! - Configuration ([`AppConfig`], [`AnalysisLimits`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, AnalysisLimits, LimitsConfig, RulesConfig, RulesMode, config_dir,
    config_file_path, init_config, init_config_at, load_config, load_config_from,
};
pub use error::{PolicyScanError, Result};
pub use types::{Category, Finding, RunResult, Sentence};
