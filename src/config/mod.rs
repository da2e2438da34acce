//! Configuration module for the navigator
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`NAVIGATOR_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use navigator::config::NavigatorConfig;
//!
//! let config = NavigatorConfig::default();
//! assert_eq!(config.economics.mpg, 20.0);
//!
//! let toml = r#"
//! [economics]
//! mpg = 18.5
//! "#;
//! let config: NavigatorConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.economics.mpg, 18.5);
//! ```

pub mod error;
pub mod fetch;
pub mod logging;
pub mod planner;

pub use error::ConfigError;
pub use fetch::{FetchConfig, ScoringConfig};
pub use logging::{Component, LogFormat, LoggingConfig};
pub use planner::{EconomicsConfig, PlannerConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unified configuration for the navigator.
///
/// ```rust
/// use navigator::config::NavigatorConfig;
///
/// let config = NavigatorConfig::default();
/// assert!(config.catalog_path.is_none());
/// assert_eq!(config.planner.fishable_minimum, 2.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Telemetry and forecast endpoints
    pub fetch: FetchConfig,
    /// Condition scorer tunables
    pub scoring: ScoringConfig,
    /// Allocation and itinerary thresholds
    pub planner: PlannerConfig,
    /// Fuel economics
    pub economics: EconomicsConfig,
    /// Site catalog to use instead of the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    /// Precomputed route table to use instead of the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes_path: Option<PathBuf>,
}

impl NavigatorConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    ///
    /// Parse errors in an existing file are still reported.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(Some(path))
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports NAVIGATOR_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("NAVIGATOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("NAVIGATOR_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(mpg) = std::env::var("NAVIGATOR_MPG") {
            if let Ok(v) = mpg.parse() {
                self.economics.mpg = v;
            }
        }
        if let Ok(adj) = std::env::var("NAVIGATOR_PRICE_ADJUSTMENT") {
            if let Ok(v) = adj.parse() {
                self.economics.price_adjustment = v;
            }
        }
        if let Ok(timeout) = std::env::var("NAVIGATOR_FETCH_TIMEOUT") {
            if let Ok(v) = timeout.parse() {
                self.fetch.timeout_seconds = v;
            }
        }

        if let Ok(path) = std::env::var("NAVIGATOR_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("NAVIGATOR_ROUTES") {
            self.routes_path = Some(PathBuf::from(path));
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;

        if !(self.economics.mpg.is_finite() && self.economics.mpg > 0.0) {
            return Err(ConfigError::invalid(
                "economics.mpg",
                "fuel efficiency must be a positive number",
            ));
        }
        if !self.economics.price_adjustment.is_finite() {
            return Err(ConfigError::invalid(
                "economics.price_adjustment",
                "price adjustment must be finite",
            ));
        }
        if self.economics.default_fuel_price < 0.0 {
            return Err(ConfigError::invalid(
                "economics.default_fuel_price",
                "fuel price cannot be negative",
            ));
        }

        if self.fetch.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "fetch.timeout_seconds",
                "timeout must be non-zero",
            ));
        }
        if self.fetch.lookback_hours == 0 {
            return Err(ConfigError::invalid(
                "fetch.lookback_hours",
                "lookback must be non-zero",
            ));
        }

        let planner = &self.planner;
        if planner.lake_two_day_rating > planner.lake_three_day_rating {
            return Err(ConfigError::invalid(
                "planner.lake_two_day_rating",
                "must not exceed planner.lake_three_day_rating",
            ));
        }
        if planner.single_leg_return_hours > planner.two_leg_return_hours {
            return Err(ConfigError::invalid(
                "planner.single_leg_return_hours",
                "must not exceed planner.two_leg_return_hours",
            ));
        }
        if planner.day_consuming_drive_hours > planner.comfortable_drive_hours {
            return Err(ConfigError::invalid(
                "planner.day_consuming_drive_hours",
                "must not exceed planner.comfortable_drive_hours",
            ));
        }
        if !(0.0..=5.0).contains(&planner.lake_default_rating) {
            return Err(ConfigError::invalid(
                "planner.lake_default_rating",
                "ratings are on a 0-5 scale",
            ));
        }

        Ok(())
    }
}
