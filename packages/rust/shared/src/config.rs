//! Application configuration for PolicyScan.
//!
//! User config lives at `~/.policyscan/policyscan.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PolicyScanError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "policyscan.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".policyscan";

// ---------------------------------------------------------------------------
// Config structs (matching policyscan.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and analysis bounds.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Custom rules file settings.
    #[serde(default)]
    pub rules: RulesConfig,
}

/// `[limits]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest accepted input, in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    /// Sentences beyond this count are not analysed.
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            max_sentences: default_max_sentences(),
        }
    }
}

fn default_max_input_bytes() -> usize {
    5 * 1024 * 1024
}
fn default_max_sentences() -> usize {
    20_000
}

/// How a custom rules file combines with the bundled rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulesMode {
    /// Merge into the bundled categories.
    #[default]
    Extend,
    /// Use the file's categories only.
    Replace,
}

/// `[rules]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Path to a custom rules TOML file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default)]
    pub mode: RulesMode,
}

// ---------------------------------------------------------------------------
// Analysis limits (runtime, merged from config)
// ---------------------------------------------------------------------------

/// Runtime bounds handed to the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisLimits {
    pub max_input_bytes: usize,
    pub max_sentences: usize,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for AnalysisLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_input_bytes: config.limits.max_input_bytes,
            max_sentences: config.limits.max_sentences,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.policyscan/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PolicyScanError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.policyscan/policyscan.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PolicyScanError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PolicyScanError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    if config.limits.max_sentences == 0 {
        return Err(PolicyScanError::config(
            "limits.max_sentences must be greater than zero",
        ));
    }

    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| PolicyScanError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PolicyScanError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| PolicyScanError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("max_input_bytes"));
        assert!(toml_str.contains("mode = \"extend\""));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[limits]
max_sentences = 50

[rules]
path = "/etc/policyscan/rules.toml"
mode = "replace"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.limits.max_sentences, 50);
        assert_eq!(config.limits.max_input_bytes, 5 * 1024 * 1024);
        assert_eq!(config.rules.mode, RulesMode::Replace);
        assert_eq!(
            config.rules.path.as_deref(),
            Some("/etc/policyscan/rules.toml")
        );
    }

    #[test]
    fn limits_from_app_config() {
        let limits = AnalysisLimits::from(&AppConfig::default());
        assert_eq!(limits.max_sentences, 20_000);
        assert_eq!(limits, AnalysisLimits::default());
    }

    #[test]
    fn init_then_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        init_config_at(&path).expect("init config");
        let loaded = load_config_from(&path).expect("load config");
        assert_eq!(loaded.limits.max_sentences, 20_000);
        assert_eq!(loaded.rules.mode, RulesMode::Extend);
        assert!(loaded.rules.path.is_none());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, PolicyScanError::Io { .. }));
    }

    #[test]
    fn zero_sentence_limit_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[limits]\nmax_sentences = 0\n").expect("write");

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("max_sentences"));
    }

    #[test]
    fn malformed_config_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[limits\n").expect("write");

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, PolicyScanError::Config { .. }));
    }
}
