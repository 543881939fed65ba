//! Typed configuration for OpenRoute.
//!
//! - TOML and JSON configuration files
//! - `.env` files and environment variable overrides
//! - Strict validation (unknown fields are rejected)
//! - Layered loading (defaults → file → env)
//!
//! The root type is [`OpenRouteConfig`]:
//!
//! - [`DocsConfig`] - OpenAPI document metadata
//! - [`LoggingConfig`] - log level and output format
//! - [`RouterConfig`] - path matching and the not-found reply
//!
//! # Example
//!
//! ```no_run
//! use openroute_config::ConfigLoader;
//!
//! # fn main() -> Result<(), openroute_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("openroute.toml")?
//!     .with_dotenv()?
//!     .with_env_prefix("OPENROUTE")
//!     .load()?;
//!
//! println!("docs title: {}", config.docs.title);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [docs]
//! title = "Articles API"
//! description = "Manage articles"
//! version = "2.1.0"
//! servers = ["https://api.example.com"]
//!
//! [logging]
//! level = "debug"
//! format = "pretty"
//!
//! [router]
//! ignore_case = false
//! trailing_slash = true
//! not_found_body = "Nothing here"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `OPENROUTE__DOCS__TITLE=Articles API`
//! - `OPENROUTE__LOGGING__LEVEL=debug`
//! - `OPENROUTE__ROUTER__IGNORE_CASE=false`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::OpenRouteConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DocsConfig, LogFormat, LoggingConfig, RouterConfig};
