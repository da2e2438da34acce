//! CLI module for the navigator
//!
//! Command-line interface definitions and shared setup for the handlers.
//!
//! # Commands
//!
//! - `plan` - Score conditions and build a day-by-day itinerary
//! - `conditions` - Show the current condition score of every site
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Ten-day trip starting today with live conditions
//! navigator plan --days 10
//!
//! # Fixed window, Smith rated by hand, Washington vetoed, no network
//! navigator plan --start 2025-01-10 --end 2025-01-19 --rating smith=4.5 --veto washington --offline
//!
//! # Generate shell completions
//! navigator completions bash > ~/.bash_completion.d/navigator
//! ```

pub mod completions;
pub mod conditions;
pub mod config;
pub mod output;
pub mod plan;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::catalog::Catalog;
use crate::config::{LogFormat, LoggingConfig, NavigatorConfig};
use crate::routing::RouteTable;
use crate::scoring::{Scorer, SiteScore};
use crate::telemetry::{ConditionFetcher, ConditionSnapshot};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Steelhead Navigator - river conditions and expedition itineraries
#[derive(Parser, Debug)]
#[command(
    name = "navigator",
    version,
    about = "Scores steelhead river conditions and plans road-trip itineraries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a day-by-day itinerary
    Plan(PlanArgs),
    /// Show site condition scores
    Conditions(ConditionsArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Parse `site=4.5` into an id and rating.
fn parse_rating(raw: &str) -> Result<(String, f64), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <id>=<rating>, got '{}'", raw))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    if !(0.0..=5.0).contains(&value) {
        return Err(format!("rating must be between 0 and 5, got {}", value));
    }
    Ok((id.trim().to_string(), value))
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "navigator.toml")]
    pub config: PathBuf,

    /// First day of the trip (YYYY-MM-DD, default today)
    #[arg(short, long)]
    pub start: Option<NaiveDate>,

    /// Last day of the trip, inclusive (YYYY-MM-DD)
    #[arg(short, long, conflicts_with = "days")]
    pub end: Option<NaiveDate>,

    /// Trip length in days
    #[arg(short, long, allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// Hub to start from instead of home
    #[arg(long = "from")]
    pub from: Option<String>,

    /// Override a site or lake rating (repeatable), e.g. --rating smith=4.5
    #[arg(short, long = "rating", value_parser = parse_rating)]
    pub ratings: Vec<(String, f64)>,

    /// Exclude a region, site or the lake (repeatable)
    #[arg(short, long = "veto")]
    pub vetoes: Vec<String>,

    /// Override fuel efficiency (miles per gallon)
    #[arg(long)]
    pub mpg: Option<f64>,

    /// Override the signed fuel price adjustment ($/gal)
    #[arg(long, allow_negative_numbers = true)]
    pub price_adjustment: Option<f64>,

    /// Skip telemetry and forecasts; every site scores as no data
    #[arg(long)]
    pub offline: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConditionsArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "navigator.toml")]
    pub config: PathBuf,

    /// Only show sites of this region
    #[arg(short, long)]
    pub region: Option<String>,

    /// Skip telemetry and forecasts
    #[arg(long)]
    pub offline: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "navigator.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration: file (if present), then env, then CLI overrides.
pub fn load_config(path: &Path, log_level: Option<&str>) -> anyhow::Result<NavigatorConfig> {
    let mut config = NavigatorConfig::load_or_default(path)
        .with_context(|| format!("loading {}", path.display()))?
        .with_env_overrides();
    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }
    config.validate()?;
    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // Logs go to stderr so table and JSON output stay clean on stdout.
    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Catalog and route table named by the config, or the built-in ones.
pub fn load_sources(config: &NavigatorConfig) -> anyhow::Result<(Catalog, RouteTable)> {
    let catalog = Catalog::load_or_builtin(config.catalog_path.as_deref())
        .context("loading site catalog")?;
    let routes =
        RouteTable::load_or_builtin(config.routes_path.as_deref()).context("loading route table")?;
    Ok((catalog, routes))
}

/// Fetch conditions (unless offline) and score every site.
pub async fn gather_scores(
    config: &NavigatorConfig,
    catalog: &Catalog,
    offline: bool,
) -> anyhow::Result<Vec<SiteScore>> {
    let snapshot = if offline {
        tracing::info!("Offline, scoring without telemetry");
        ConditionSnapshot::empty()
    } else {
        ConditionFetcher::with_http(&config.fetch)?
            .fetch(catalog)
            .await
    };
    Ok(Scorer::new(config.scoring.clone()).score_catalog(catalog, &snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_plan_defaults() {
        let cli = Cli::try_parse_from(["navigator", "plan"]).unwrap();
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.config, PathBuf::from("navigator.toml"));
                assert!(args.start.is_none());
                assert!(args.ratings.is_empty());
                assert!(!args.offline);
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_parse_plan_window_and_overrides() {
        let cli = Cli::try_parse_from([
            "navigator",
            "plan",
            "--start",
            "2025-01-10",
            "--end",
            "2025-01-19",
            "--rating",
            "smith=4.5",
            "--rating",
            "pyramid=3",
            "--veto",
            "olympic",
            "--price-adjustment",
            "-0.25",
        ])
        .unwrap();
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.start, NaiveDate::from_ymd_opt(2025, 1, 10));
                assert_eq!(args.end, NaiveDate::from_ymd_opt(2025, 1, 19));
                assert_eq!(
                    args.ratings,
                    vec![("smith".to_string(), 4.5), ("pyramid".to_string(), 3.0)]
                );
                assert_eq!(args.vetoes, vec!["olympic"]);
                assert_eq!(args.price_adjustment, Some(-0.25));
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_rejects_end_with_days() {
        let result = Cli::try_parse_from(["navigator", "plan", "--end", "2025-01-19", "--days", "5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_bad_rating() {
        assert!(Cli::try_parse_from(["navigator", "plan", "--rating", "smith"]).is_err());
        assert!(Cli::try_parse_from(["navigator", "plan", "--rating", "smith=7"]).is_err());
    }

    #[test]
    fn test_cli_parse_conditions() {
        let cli = Cli::try_parse_from(["navigator", "conditions", "--json", "--offline"]).unwrap();
        match cli.command {
            Commands::Conditions(args) => {
                assert!(args.json);
                assert!(args.offline);
            }
            _ => panic!("Expected Conditions command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["navigator", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => {
                assert_eq!(args.output, PathBuf::from("navigator.toml"));
                assert!(args.force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/navigator.toml"), Some("debug")).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.economics.mpg, 20.0);
    }

    #[test]
    fn test_gather_scores_offline_skips_network() {
        let config = NavigatorConfig::default();
        let (catalog, _) = load_sources(&config).unwrap();

        let scores = tokio_test::block_on(gather_scores(&config, &catalog, true)).unwrap();
        assert_eq!(scores.len(), catalog.sites().len());
        assert!(scores
            .iter()
            .all(|s| !s.score.status.is_measured()));
    }
}
