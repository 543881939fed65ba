//! # OpenRoute Core
//!
//! Route descriptors and the request pipeline that runs them.
//!
//! - [`route`] / [`RouteBuilder`] - declare a route and check it once with
//!   [`RouteBuilder::build`]
//! - [`RouteDescriptor`] - the immutable result, with metadata for docs and
//!   [`execute`](RouteDescriptor::execute) for requests
//! - [`Middleware`] and [`Handler`] - the per-request logic
//! - [`Dispatcher`] - routes requests to descriptors by method and path
//! - [`Request`] / [`ResponseSink`] - the transport-neutral request and
//!   response surfaces
//!
//! ## Example
//!
//! ```
//! use openroute_core::{route, BuildOptions, Request, RouteError};
//! use openroute_schema::Schema;
//! use serde_json::json;
//!
//! let create = route()
//!     .set_path("POST", "/articles")
//!     .set_request_data(Schema::object().property("title", Schema::string().min_length(10)))
//!     .set_response_data(Schema::object().property("title", Schema::string()))
//!     .set_handle(|req: Request| async move {
//!         Ok::<_, RouteError>(json!({ "title": req.data()["title"] }))
//!     })
//!     .build(BuildOptions::default().response_code(201))
//!     .unwrap();
//!
//! assert_eq!(create.meta().method, "post");
//! assert_eq!(create.status_code().as_u16(), 201);
//! ```

#![doc(html_root_url = "https://docs.rs/openroute-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dispatcher;
mod error;
mod handler;
mod middleware;
pub mod pipeline;
mod request;
mod response;
mod route;

pub use dispatcher::{Dispatcher, DispatcherOptions, DEFAULT_NOT_FOUND_BODY};
pub use error::{BuildError, ErrorCategory, RouteError, RouteResult};
pub use handler::{BoxedHandler, Handler};
pub use middleware::{middleware_fn, BoxFuture, BoxedMiddleware, FnMiddleware, Middleware};
pub use request::Request;
pub use response::{BufferedResponse, ResponseSink};
pub use route::{
    route, BodyMeta, BuildOptions, ParamMeta, RouteBuilder, RouteDescriptor, RouteMeta,
};
