//! Route definition.
//!
//! [`route()`] hands out a fresh [`RouteBuilder`]; each setter consumes and
//! returns the builder, and [`RouteBuilder::build`] checks the definition as
//! a whole and freezes it into a [`RouteDescriptor`].
//!
//! # Example
//!
//! ```
//! use openroute_core::{route, BuildOptions, Request, RouteError};
//! use openroute_schema::Schema;
//!
//! let descriptor = route()
//!     .set_path("post", "/articles/:id/:name")
//!     .set_params(
//!         Schema::object()
//!             .property("id", Schema::string())
//!             .property("name", Schema::string().min_length(3)),
//!     )
//!     .set_request_data(Schema::object().property("title", Schema::string()))
//!     .set_handle(|req: Request| async move { Ok::<_, RouteError>(req.data().clone()) })
//!     .build(BuildOptions::default().summary("Create an article"))
//!     .unwrap();
//!
//! assert_eq!(descriptor.method(), http::Method::POST);
//! assert_eq!(descriptor.meta().path, "/articles/{id}/{name}");
//! ```

use std::sync::Arc;

use http::{Method, StatusCode};
use openroute_schema::{Schema, SchemaSource, Surface, Validator};
use serde::Serialize;

use crate::error::BuildError;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{BoxedMiddleware, Middleware};

/// Returns a fresh, empty route builder.
///
/// Every call yields an independent builder; no state is shared between
/// route definitions.
#[must_use]
pub fn route() -> RouteBuilder {
    RouteBuilder::default()
}

/// Options applied when a route is finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Short description for documentation.
    pub summary: Option<String>,
    /// Success status code.
    pub response_code: u16,
    /// Content type of the request body in documentation.
    pub accepts: String,
    /// Content type of the response body in documentation.
    pub responds: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            summary: None,
            response_code: 200,
            accepts: "application/json".to_string(),
            responds: "application/json".to_string(),
        }
    }
}

impl BuildOptions {
    /// Sets the summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the success status code.
    #[must_use]
    pub fn response_code(mut self, code: u16) -> Self {
        self.response_code = code;
        self
    }

    /// Sets the documented request content type.
    #[must_use]
    pub fn accepts(mut self, content_type: impl Into<String>) -> Self {
        self.accepts = content_type.into();
        self
    }

    /// Sets the documented response content type.
    #[must_use]
    pub fn responds(mut self, content_type: impl Into<String>) -> Self {
        self.responds = content_type.into();
        self
    }
}

/// A documented path parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamMeta {
    /// Parameter name.
    pub name: String,
    /// Whether the parameter is required.
    pub required: bool,
    /// Parameter schema.
    pub schema: Schema,
}

/// A documented request or response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMeta {
    /// Content type.
    pub content_type: String,
    /// Body schema.
    pub schema: Schema,
}

/// OpenAPI-shaped metadata assembled when a route is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMeta {
    /// Lowercase method name.
    pub method: String,
    /// Path with `:name` rewritten to `{name}`.
    pub path: String,
    /// Summary, if given.
    pub summary: Option<String>,
    /// Path parameters, in params schema order.
    pub parameters: Vec<ParamMeta>,
    /// Request body, if a request data schema was set.
    pub request_body: Option<BodyMeta>,
    /// Success response body, if a response schema was set.
    pub response_body: Option<BodyMeta>,
    /// Success status code.
    pub status_code: u16,
}

/// Accumulates a route definition.
///
/// Setters may be called in any order; only [`build`](Self::build) checks
/// that the pieces fit together. Failures detected by a setter (such as a
/// schema that does not compile) are kept and reported by `build`.
#[derive(Default)]
pub struct RouteBuilder {
    method: Option<String>,
    path: Option<String>,
    params: Option<Validator>,
    headers: Option<Validator>,
    request_data: Option<Validator>,
    response_data: Option<Validator>,
    middlewares: Vec<BoxedMiddleware>,
    handler: Option<BoxedHandler>,
    error: Option<BuildError>,
}

impl std::fmt::Debug for RouteBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteBuilder")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("middlewares", &self.middlewares.len())
            .field("has_handler", &self.handler.is_some())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

fn body_forbidden(method: &str) -> bool {
    method == "GET" || method == "OPTIONS"
}

impl RouteBuilder {
    /// Sets the method and path.
    ///
    /// The method is uppercased; an empty path becomes `/`.
    #[must_use]
    pub fn set_path(mut self, method: impl AsRef<str>, path: impl Into<String>) -> Self {
        let path = path.into();
        self.method = Some(method.as_ref().trim().to_ascii_uppercase());
        self.path = Some(if path.is_empty() { "/".to_string() } else { path });
        self
    }

    fn compile(&mut self, source: SchemaSource, surface: Surface) -> Option<Validator> {
        match Validator::compile(source.resolve(surface)) {
            Ok(validator) => Some(validator),
            Err(source) => {
                self.error
                    .get_or_insert(BuildError::InvalidSchema { surface, source });
                None
            }
        }
    }

    /// Sets the path parameter schema.
    #[must_use]
    pub fn set_params(mut self, schema: impl Into<SchemaSource>) -> Self {
        self.params = self.compile(schema.into(), Surface::Params);
        self
    }

    /// Sets the request header schema.
    ///
    /// Header names are matched case-insensitively, so property names are
    /// lowercased.
    #[must_use]
    pub fn set_request_headers(mut self, schema: impl Into<SchemaSource>) -> Self {
        let schema = lowercase_header_names(schema.into().resolve(Surface::Headers));
        self.headers = self.compile(schema.into(), Surface::Headers);
        self
    }

    /// Sets the schema for query and body values combined.
    ///
    /// Not allowed on GET or OPTIONS routes. The error is recorded
    /// immediately and returned by [`build`](Self::build); use
    /// [`try_set_request_data`](Self::try_set_request_data) to observe it at
    /// the call site.
    #[must_use]
    pub fn set_request_data(self, schema: impl Into<SchemaSource>) -> Self {
        match self.try_set_request_data(schema) {
            Ok(builder) => builder,
            Err((mut builder, err)) => {
                builder.error.get_or_insert(err);
                builder
            }
        }
    }

    /// Like [`set_request_data`](Self::set_request_data), but fails right
    /// away on GET or OPTIONS, handing the builder back with the error.
    pub fn try_set_request_data(
        mut self,
        schema: impl Into<SchemaSource>,
    ) -> Result<Self, (Self, BuildError)> {
        if let Some(method) = self.method.as_deref().filter(|m| body_forbidden(m)) {
            let err = BuildError::RequestDataNotAllowed {
                method: method.to_string(),
            };
            return Err((self, err));
        }
        self.request_data = self.compile(schema.into(), Surface::RequestData);
        Ok(self)
    }

    /// Sets the response schema. Handler results are checked against it
    /// and stripped to its shape.
    #[must_use]
    pub fn set_response_data(mut self, schema: impl Into<SchemaSource>) -> Self {
        self.response_data = self.compile(schema.into(), Surface::ResponseData);
        self
    }

    /// Replaces the middleware chain.
    #[must_use]
    pub fn set_middlewares<I>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = BoxedMiddleware>,
    {
        self.middlewares = middlewares.into_iter().collect();
        self
    }

    /// Appends one middleware to the chain.
    #[must_use]
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Sets the terminal handler.
    #[must_use]
    pub fn set_handle(mut self, handler: impl Handler) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Checks the definition and freezes it.
    pub fn build(self, options: BuildOptions) -> Result<RouteDescriptor, BuildError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let (Some(method_name), Some(path)) = (self.method, self.path) else {
            return Err(BuildError::MissingMethodOrPath);
        };
        if method_name.is_empty() {
            return Err(BuildError::MissingMethodOrPath);
        }
        let method = Method::from_bytes(method_name.as_bytes())
            .ok()
            .filter(openroute_router::is_supported)
            .ok_or_else(|| BuildError::UnsupportedMethod(method_name.clone()))?;

        let handler = self.handler.ok_or(BuildError::MissingHandler)?;

        if self.request_data.is_some() && body_forbidden(&method_name) {
            return Err(BuildError::RequestDataNotAllowed {
                method: method_name,
            });
        }

        let status = StatusCode::from_u16(options.response_code)
            .map_err(|_| BuildError::InvalidStatus(options.response_code))?;

        let params = self.params.unwrap_or_else(Validator::identity);
        let path_params = path_param_names(&path)?;
        for name in &path_params {
            let declared = params.schema().is_some_and(|s| s.requires(name));
            if !declared {
                return Err(BuildError::MissingPathParam {
                    name: (*name).to_string(),
                    path: path.clone(),
                });
            }
        }

        let headers = self.headers.unwrap_or_else(Validator::identity);
        let request_data = self.request_data.unwrap_or_else(Validator::identity);
        let response_data = self.response_data.unwrap_or_else(Validator::identity);

        let meta = RouteMeta {
            method: method.as_str().to_ascii_lowercase(),
            path: openapi_path(&path),
            summary: options.summary,
            parameters: params
                .schema()
                .map(|schema| {
                    schema
                        .properties
                        .iter()
                        .map(|(name, property)| ParamMeta {
                            name: name.clone(),
                            required: schema.requires(name),
                            schema: property.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            request_body: request_data.schema().map(|schema| BodyMeta {
                content_type: options.accepts.clone(),
                schema: schema.clone(),
            }),
            response_body: response_data.schema().map(|schema| BodyMeta {
                content_type: options.responds.clone(),
                schema: schema.clone(),
            }),
            status_code: status.as_u16(),
        };

        tracing::debug!(method = %method, path = %path, "route built");

        Ok(RouteDescriptor {
            inner: Arc::new(RouteInner {
                method,
                path,
                params,
                headers,
                request_data,
                response_data,
                middlewares: self.middlewares,
                handler,
                status,
                meta,
            }),
        })
    }
}

/// Names of the `:name` segments in `path`, in order.
fn path_param_names(path: &str) -> Result<Vec<&str>, BuildError> {
    let mut names: Vec<&str> = Vec::new();
    for name in path.split('/').filter_map(|segment| segment.strip_prefix(':')) {
        if name.is_empty() {
            return Err(BuildError::InvalidPath(path.to_string()));
        }
        if names.contains(&name) {
            return Err(BuildError::DuplicatePathParam {
                name: name.to_string(),
                path: path.to_string(),
            });
        }
        names.push(name);
    }
    Ok(names)
}

/// Lowercases the top-level property names of a header schema, matching
/// how request headers are stored.
fn lowercase_header_names(mut schema: Schema) -> Schema {
    schema.properties = schema
        .properties
        .into_iter()
        .map(|(name, property)| (name.to_ascii_lowercase(), property))
        .collect();
    for name in &mut schema.required {
        name.make_ascii_lowercase();
    }
    schema
}

/// Rewrites `:name` segments as `{name}`.
fn openapi_path(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) struct RouteInner {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) params: Validator,
    pub(crate) headers: Validator,
    pub(crate) request_data: Validator,
    pub(crate) response_data: Validator,
    pub(crate) middlewares: Vec<BoxedMiddleware>,
    pub(crate) handler: BoxedHandler,
    pub(crate) status: StatusCode,
    pub(crate) meta: RouteMeta,
}

/// An immutable, fully checked route.
///
/// Cheap to clone and safe to share across concurrent requests. Run a
/// request through it with [`execute`](Self::execute).
#[derive(Clone)]
pub struct RouteDescriptor {
    pub(crate) inner: Arc<RouteInner>,
}

impl std::fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("method", &self.inner.method)
            .field("path", &self.inner.path)
            .field("middlewares", &self.inner.middlewares.len())
            .finish_non_exhaustive()
    }
}

impl RouteDescriptor {
    /// The route's method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.inner.method.clone()
    }

    /// The route's path pattern, with `:name` segments.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Documentation metadata.
    #[must_use]
    pub fn meta(&self) -> &RouteMeta {
        &self.inner.meta
    }

    /// Success status code.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.inner.status
    }

    /// Path parameter validator.
    #[must_use]
    pub fn params_validator(&self) -> &Validator {
        &self.inner.params
    }

    /// Header validator.
    #[must_use]
    pub fn headers_validator(&self) -> &Validator {
        &self.inner.headers
    }

    /// Request data validator; the identity validator on GET and OPTIONS.
    #[must_use]
    pub fn request_data_validator(&self) -> &Validator {
        &self.inner.request_data
    }

    /// Response validator.
    #[must_use]
    pub fn response_validator(&self) -> &Validator {
        &self.inner.response_data
    }

    /// Number of middlewares in the chain.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.inner.middlewares.len()
    }
}
