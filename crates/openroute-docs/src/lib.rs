//! # OpenRoute Docs
//!
//! OpenAPI 3.0 document generation from built OpenRoute routes.
//!
//! Each [`RouteDescriptor`](openroute_core::RouteDescriptor) carries the
//! metadata assembled when it was built: method, path with `{name}`
//! parameters, summary, parameter schemas and body schemas. The
//! [`OpenApiGenerator`] collects those into one document.
//!
//! ```rust,ignore
//! use openroute_docs::OpenApiGenerator;
//!
//! let json = OpenApiGenerator::new()
//!     .title("Articles API")
//!     .server("https://api.example.com")
//!     .generate_json(&routes)?;
//! ```

#![warn(missing_docs)]

mod error;
mod generator;
mod openapi;

pub use error::{DocsError, DocsResult};
pub use generator::OpenApiGenerator;
pub use openapi::{
    Info, MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem, RequestBody, Response,
    Server, OPENAPI_VERSION,
};
