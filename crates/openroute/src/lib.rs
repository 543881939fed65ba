//! # OpenRoute
//!
//! **Typed HTTP route definitions with schema validation and OpenAPI output**
//!
//! OpenRoute describes each endpoint once (method, path, schemas for every
//! input and output surface, middlewares and a handler) and derives from
//! that description both runtime behaviour and API documentation:
//!
//! - Routes are checked once, when built, so a misconfigured route never
//!   reaches the router
//! - Headers, path parameters and the merged query/body are validated and
//!   stripped to their schemas before any middleware runs
//! - Handler results are validated and stripped to the response schema
//! - Every built route projects into an OpenAPI 3.0 document
//!
//! ## Quick Start
//!
//! ```rust
//! use openroute::prelude::*;
//! use serde_json::json;
//!
//! let list = route()
//!     .set_path("GET", "/articles")
//!     .set_response_data(Schema::array(Schema::object().property("title", Schema::string())))
//!     .set_handle(|_req: Request| async { Ok::<_, RouteError>(json!([])) })
//!     .build(BuildOptions::default().summary("List articles"))
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new([list.clone()]).unwrap();
//! let doc = OpenApiGenerator::new().generate(&[list]).unwrap();
//! assert!(doc.paths.contains_key("/articles"));
//! # drop(dispatcher);
//! ```
//!
//! ## Request pipeline
//!
//! ```text
//! Request → Router → Headers → Params → Query+Body → Middlewares → Handler
//!                                                                    ↓
//! Response ←──────────────────────────────────────── Response schema ┘
//! ```

#![doc(html_root_url = "https://docs.rs/openroute/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use openroute_config::OpenRouteConfig;
use openroute_core::{BuildError, Dispatcher, RouteDescriptor};
use openroute_docs::OpenApiGenerator;
use openroute_telemetry::{LogConfig, TelemetryResult};

// Re-export schema types
pub use openroute_schema as schema;

// Re-export router types
pub use openroute_router as router;

// Re-export route, pipeline and dispatcher types
pub use openroute_core as core;

// Re-export OpenAPI generation
pub use openroute_docs as docs;

// Re-export configuration
pub use openroute_config as config;

// Re-export logging setup
pub use openroute_telemetry as telemetry;

/// Builds a dispatcher using the `router` section of `config`.
///
/// # Errors
///
/// Returns `BuildError::Router` if two routes conflict.
pub fn dispatcher_from_config(
    routes: impl IntoIterator<Item = RouteDescriptor>,
    config: &OpenRouteConfig,
) -> Result<Dispatcher, BuildError> {
    Dispatcher::with_options(routes, config.router.dispatcher_options())
}

/// Creates an OpenAPI generator from the `docs` section of `config`.
#[must_use]
pub fn docs_from_config(config: &OpenRouteConfig) -> OpenApiGenerator {
    OpenApiGenerator::from_config(&config.docs)
}

/// Installs logging as described by the `logging` section of `config`.
///
/// # Errors
///
/// Fails if the level is not a valid filter or a subscriber is already set.
pub fn init_logging(config: &OpenRouteConfig) -> TelemetryResult<()> {
    openroute_telemetry::init_logging(&LogConfig::from(&config.logging))
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use openroute::prelude::*;
/// ```
pub mod prelude {
    pub use openroute_core::{
        middleware_fn, route, BoxedMiddleware, BufferedResponse, BuildError, BuildOptions,
        Dispatcher, DispatcherOptions, Handler, Middleware, Request, ResponseSink, RouteBuilder,
        RouteDescriptor, RouteError, RouteResult,
    };

    pub use openroute_schema::{
        schema_table, FieldDef, Format, Schema, SchemaSource, Schematic, StructDef, Surface,
        UploadedFile, Validator,
    };

    pub use openroute_router::RouterOptions;

    pub use openroute_docs::OpenApiGenerator;

    pub use openroute_config::{ConfigLoader, OpenRouteConfig};
}

#[cfg(test)]
mod tests {
    use super::*;
    use openroute_config::ConfigLoader;

    #[test]
    fn test_helpers_follow_config() {
        let config = ConfigLoader::new()
            .with_string(
                r#"
                [docs]
                title = "Articles API"
                servers = ["https://api.example.com"]

                [router]
                not_found_body = "nothing here"
                "#,
                "toml",
            )
            .unwrap()
            .load()
            .unwrap();

        let doc = docs_from_config(&config).generate(&[]).unwrap();
        assert_eq!(doc.info.title, "Articles API");
        assert_eq!(doc.servers.len(), 1);

        let dispatcher = dispatcher_from_config(Vec::<RouteDescriptor>::new(), &config).unwrap();
        assert!(dispatcher.routes().is_empty());
    }
}
