//! Configuration section types.

use openroute_core::DispatcherOptions;
use openroute_router::RouterOptions;
use serde::{Deserialize, Serialize};

/// OpenAPI document metadata.
///
/// # Example
///
/// ```
/// use openroute_config::DocsConfig;
///
/// let docs = DocsConfig::default();
/// assert_eq!(docs.title, "OpenAPI Docs");
/// assert_eq!(docs.version, "1.0.0");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Document description.
    #[serde(default = "default_description")]
    pub description: String,

    /// API version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Server base URLs.
    #[serde(default)]
    pub servers: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            version: default_version(),
            servers: Vec::new(),
        }
    }
}

fn default_title() -> String {
    "OpenAPI Docs".to_string()
}

fn default_description() -> String {
    "Openapi api description".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (e.g. `info`, `openroute_core=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Path matching and not-found behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Match literal segments without regard to ASCII case.
    #[serde(default = "default_true")]
    pub ignore_case: bool,

    /// Treat a trailing slash as insignificant.
    #[serde(default = "default_true")]
    pub trailing_slash: bool,

    /// Plain-text body written when no route matches.
    #[serde(default = "default_not_found_body")]
    pub not_found_body: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            ignore_case: true,
            trailing_slash: true,
            not_found_body: default_not_found_body(),
        }
    }
}

impl RouterConfig {
    /// Dispatcher options for this section.
    ///
    /// ```
    /// use openroute_config::RouterConfig;
    ///
    /// let options = RouterConfig::default().dispatcher_options();
    /// assert!(options.router.ignore_case);
    /// assert_eq!(options.not_found_body, "404 Not Found!");
    /// ```
    #[must_use]
    pub fn dispatcher_options(&self) -> DispatcherOptions {
        DispatcherOptions::default()
            .router(RouterOptions {
                ignore_case: self.ignore_case,
                trailing_slash: self.trailing_slash,
            })
            .not_found_body(self.not_found_body.clone())
    }
}

fn default_not_found_body() -> String {
    openroute_core::DEFAULT_NOT_FOUND_BODY.to_string()
}

fn default_true() -> bool {
    true
}
