//! Tracing setup helpers
//!
//! Builds the filter string handed to `tracing_subscriber::EnvFilter`.

use crate::config::LoggingConfig;

/// Filter directives for `EnvFilter`: the base level, then one
/// `navigator::<component>=<level>` directive per override.
///
/// # Examples
///
/// ```
/// use navigator::config::{Component, LoggingConfig};
/// use navigator::logging::build_filter_directives;
///
/// let mut config = LoggingConfig::default();
/// config.level = "info".to_string();
/// config
///     .component_levels
///     .insert(Component::Planner, "debug".to_string());
///
/// assert_eq!(build_filter_directives(&config), "info,navigator::planner=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    config
        .component_levels
        .iter()
        .fold(config.level.clone(), |mut filter, (component, level)| {
            filter.push_str(&format!(",{}={}", component.target(), level));
            filter
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Component;

    #[test]
    fn test_filter_base_level_only() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_filter_components_in_declaration_order() {
        let mut config = LoggingConfig {
            level: "error".to_string(),
            ..LoggingConfig::default()
        };
        config
            .component_levels
            .insert(Component::Planner, "trace".to_string());
        config
            .component_levels
            .insert(Component::Telemetry, "info".to_string());

        assert_eq!(
            build_filter_directives(&config),
            "error,navigator::telemetry=info,navigator::planner=trace"
        );
    }
}
