//! Root configuration type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DocsConfig, LogFormat, LoggingConfig, RouterConfig};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Complete OpenRoute configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use openroute_config::OpenRouteConfig;
///
/// let config = OpenRouteConfig::default();
/// assert!(config.router.ignore_case);
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct OpenRouteConfig {
    /// OpenAPI document metadata.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Router configuration.
    #[serde(default)]
    pub router: RouterConfig,
}

impl OpenRouteConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The log level is neither a level name nor a filter directive
    /// - The docs title or version is empty
    /// - A docs server URL is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.trim();
        let is_level = LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str());
        if !is_level && !level.contains('=') {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!("unknown level '{}'", self.logging.level),
            ));
        }

        if self.docs.title.trim().is_empty() {
            return Err(ConfigError::invalid_value("docs.title", "must not be empty"));
        }
        if self.docs.version.trim().is_empty() {
            return Err(ConfigError::invalid_value("docs.version", "must not be empty"));
        }
        if let Some(idx) = self.docs.servers.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::invalid_value(
                format!("docs.servers[{idx}]"),
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Development preset: debug level, pretty output with locations.
    ///
    /// ```
    /// use openroute_config::{LogFormat, OpenRouteConfig};
    ///
    /// let config = OpenRouteConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Production preset: info level, JSON output.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}
