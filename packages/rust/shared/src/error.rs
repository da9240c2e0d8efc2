//! Error types for PolicyScan.
//!
//! Library crates use [`PolicyScanError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all fallible PolicyScan operations.
///
/// Analysis itself never fails; only loading config, rules and input does.
#[derive(Debug, thiserror::Error)]
pub enum PolicyScanError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// TOML parsing error for rules or config content.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rules table validation error (blank keyword, duplicate id, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Input exceeds the configured byte limit.
    #[error("input is {size} bytes, limit is {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PolicyScanError>;

impl PolicyScanError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
