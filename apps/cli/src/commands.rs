//! CLI command definitions, routing, and tracing setup.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use policyscan_core::{RuleSet, analyze};
use policyscan_shared::{
    AnalysisLimits, AppConfig, RulesMode, init_config, init_config_at, load_config,
    load_config_from,
};
use tracing::{info, warn};

use crate::input::{self, PASTE_PROMPT};
use crate::report;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// PolicyScan: flag sensitive data practices in a privacy policy.
#[derive(Parser)]
#[command(
    name = "policyscan",
    version,
    about = "Flag potentially sensitive data practices in a privacy policy.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Privacy policy text file. Without it, paste the policy and end with a blank line.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Custom rules file (overrides `[rules].path` from the config).
    #[arg(long, value_name = "PATH", global = true)]
    pub rules: Option<PathBuf>,

    /// How the custom rules combine with the bundled ones.
    #[arg(long, value_enum, global = true)]
    pub rules_mode: Option<RulesModeArg>,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Config file to use instead of ~/.policyscan/policyscan.toml.
    #[arg(long, value_name = "PATH", env = "POLICYSCAN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum RulesModeArg {
    Extend,
    Replace,
}

impl From<RulesModeArg> for RulesMode {
    fn from(arg: RulesModeArg) -> Self {
        match arg {
            RulesModeArg::Extend => RulesMode::Extend,
            RulesModeArg::Replace => RulesMode::Replace,
        }
    }
}

/// Subcommands. Without one, the policy is analysed.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the active categories.
    Categories {
        /// Print the active rules as a TOML rules file instead.
        #[arg(long)]
        toml: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "policyscan=warn",
        1 => "policyscan=info",
        2 => "policyscan=debug",
        _ => "policyscan=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        None => cmd_analyze(&cli),
        Some(Command::Categories { toml }) => cmd_categories(&cli, *toml),
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(cli.config.as_deref()),
            ConfigAction::Show => cmd_config_show(&cli),
        },
    }
}

/// Load the config named by `--config`, or the default one.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Bundled rules, combined with the custom rules file if one is configured.
///
/// Table inconsistencies are logged, never fatal.
pub(crate) fn resolve_rules(cli: &Cli, config: &AppConfig) -> Result<RuleSet> {
    let path = cli
        .rules
        .clone()
        .or_else(|| config.rules.path.as_ref().map(PathBuf::from));
    let mode = cli
        .rules_mode
        .map(RulesMode::from)
        .unwrap_or(config.rules.mode);

    let rules = match path {
        Some(path) => {
            let custom = RuleSet::load(&path)
                .wrap_err_with(|| format!("could not load rules from {}", path.display()))?;
            info!(path = %path.display(), ?mode, "using custom rules");
            RuleSet::bundled().merge(custom, mode)
        }
        None => RuleSet::bundled(),
    };

    for issue in rules.validate() {
        warn!(%issue, "rules table inconsistency");
    }

    Ok(rules)
}

fn cmd_analyze(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let limits = AnalysisLimits::from(&config);
    let rules = resolve_rules(cli, &config)?;

    let text = match &cli.file {
        Some(path) => input::read_policy_file(path, limits.max_input_bytes)?,
        None => {
            eprintln!("{PASTE_PROMPT}");
            eprintln!();
            input::read_until_blank(std::io::stdin().lock(), limits.max_input_bytes)?
        }
    };

    info!(bytes = text.len(), categories = rules.keywords.len(), "analysing policy");
    let result = analyze(&text, &rules, &limits);

    let mut stdout = std::io::stdout().lock();
    match cli.format {
        OutputFormat::Text => {
            writeln!(stdout)?;
            report::write_text(&mut stdout, &result)?;
        }
        OutputFormat::Json => report::write_json(&mut stdout, &result)?,
    }

    Ok(())
}

fn cmd_categories(cli: &Cli, as_toml: bool) -> Result<()> {
    let config = resolve_config(cli)?;
    let rules = resolve_rules(cli, &config)?;

    if as_toml {
        println!("{}", toml::to_string_pretty(&rules.to_rules_file())?);
        return Ok(());
    }

    for (category, keywords) in rules.keywords.iter() {
        let recs = rules
            .recommendations
            .get(category)
            .map_or(0, <[String]>::len);
        println!(
            "{:<22} {:<22} {:>3} keywords  {:>3} recommendations",
            category.id,
            category.label,
            keywords.len(),
            recs
        );
    }

    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => {
            init_config_at(p)?;
            p.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid args")
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_args_means_interactive_text() {
        let cli = parse(&["policyscan"]);
        assert!(cli.file.is_none());
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn file_flag_short_and_long() {
        let cli = parse(&["policyscan", "-f", "policy.txt"]);
        assert_eq!(cli.file.as_deref(), Some(Path::new("policy.txt")));

        let cli = parse(&["policyscan", "--file", "p.txt", "--format", "json"]);
        assert_eq!(cli.file.as_deref(), Some(Path::new("p.txt")));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn help_flag_is_reported_as_display_help() {
        let err = Cli::try_parse_from(["policyscan", "--help"])
            .err()
            .expect("help short-circuits");
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn subcommands_parse() {
        let cli = parse(&["policyscan", "categories", "--toml"]);
        assert!(matches!(cli.command, Some(Command::Categories { toml: true })));

        let cli = parse(&["policyscan", "config", "show"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }

    #[test]
    fn resolve_rules_defaults_to_bundled() {
        let cli = parse(&["policyscan"]);
        let rules = resolve_rules(&cli, &AppConfig::default()).expect("rules");
        assert_eq!(rules.keywords.len(), 8);
    }

    #[test]
    fn resolve_rules_flag_overrides_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.toml");
        std::fs::write(
            &path,
            "[[categories]]\nid = \"biometrics\"\nkeywords = [\"face scan\"]\n",
        )
        .expect("write");

        let path_str = path.to_string_lossy().to_string();
        let cli = parse(&["policyscan", "--rules", &path_str, "--rules-mode", "replace"]);
        let rules = resolve_rules(&cli, &AppConfig::default()).expect("rules");
        let ids: Vec<&str> = rules.keywords.categories().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["biometrics"]);
    }

    #[test]
    fn resolve_rules_from_config_extends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.toml");
        std::fs::write(
            &path,
            "[[categories]]\nid = \"biometrics\"\nkeywords = [\"face scan\"]\nrecommendations = [\"Skip face unlock.\"]\n",
        )
        .expect("write");

        let mut config = AppConfig::default();
        config.rules.path = Some(path.to_string_lossy().to_string());

        let cli = parse(&["policyscan"]);
        let rules = resolve_rules(&cli, &config).expect("rules");
        assert_eq!(rules.keywords.len(), 9);
        assert!(rules.validate().is_empty());
    }

    #[test]
    fn resolve_rules_missing_file_errors() {
        let cli = parse(&["policyscan", "--rules", "/nonexistent/policyscan-rules.toml"]);
        let err = resolve_rules(&cli, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("could not load rules"));
    }
}
