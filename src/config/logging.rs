//! `[logging]` section

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Navigator modules that can be given their own log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Catalog,
    Telemetry,
    Scoring,
    Routing,
    Planner,
    Cli,
}

impl Component {
    /// Tracing target prefix for the component's events.
    pub fn target(&self) -> &'static str {
        match self {
            Component::Catalog => "navigator::catalog",
            Component::Telemetry => "navigator::telemetry",
            Component::Scoring => "navigator::scoring",
            Component::Routing => "navigator::routing",
            Component::Planner => "navigator::planner",
            Component::Cli => "navigator::cli",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Per-component overrides, e.g. `planner = "debug"` to see skipped regions
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component_levels: BTreeMap<Component, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            // Plans go to stdout, so the CLI stays quiet unless asked.
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            component_levels: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let known = |level: &str| LEVELS.contains(&level.to_lowercase().as_str());
        if !known(&self.level) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("'{}' is not one of {}", self.level, LEVELS.join(", ")),
            ));
        }
        for (component, level) in &self.component_levels {
            if !known(level) {
                return Err(ConfigError::invalid(
                    &format!("logging.component_levels.{}", component.target()),
                    format!("'{}' is not one of {}", level, LEVELS.join(", ")),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_component_levels_parse() {
        let toml = r#"
        level = "info"

        [component_levels]
        planner = "debug"
        telemetry = "warn"
        "#;
        let config: LoggingConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.component_levels.get(&Component::Planner).map(String::as_str),
            Some("debug")
        );
        assert_eq!(config.component_levels.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_component_rejected() {
        let toml = r#"
        [component_levels]
        dashboard = "debug"
        "#;
        assert!(toml::from_str::<LoggingConfig>(toml).is_err());
    }

    #[test]
    fn test_bad_levels_fail_validation() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = LoggingConfig::default();
        config
            .component_levels
            .insert(Component::Routing, "chatty".to_string());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("navigator::routing"));
    }
}
