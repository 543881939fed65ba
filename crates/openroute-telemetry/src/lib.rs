//! Logging setup for OpenRoute.
//!
//! Every OpenRoute crate logs through `tracing`. This crate installs a
//! `tracing-subscriber` registry that writes those events as JSON (for
//! production) or in a human-readable format (for development).
//!
//! # Example
//!
//! ```rust,ignore
//! use openroute_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(routes = 12, "dispatcher ready");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
