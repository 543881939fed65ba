//! Route middleware.
//!
//! Middlewares run in registration order after input validation and before
//! the handler. Each one is awaited to completion before the next starts. A
//! middleware may finish the response itself (for example, to reject an
//! unauthenticated caller); the pipeline then stops without running the
//! remaining middlewares or the handler.
//!
//! # Example
//!
//! ```
//! use openroute_core::{middleware_fn, BoxedMiddleware, RouteError};
//!
//! let require_key: BoxedMiddleware = middleware_fn("require-key", |req, _res| {
//!     Box::pin(async move {
//!         match req.header("x-api-key") {
//!             Some(_) => Ok(()),
//!             None => Err(RouteError::authentication("missing api key")),
//!         }
//!     })
//! });
//! assert_eq!(require_key.name(), "require-key");
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::RouteError;
use crate::request::Request;
use crate::response::ResponseSink;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased middleware that can be stored in a route.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Pre-handler logic attached to a route.
///
/// Returning `Err` aborts the request with that error unless the response
/// has already been finished.
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Inspects or mutates the request, or finishes the response early.
    fn call<'a>(
        &'a self,
        request: &'a mut Request,
        response: &'a mut dyn ResponseSink,
    ) -> BoxFuture<'a, Result<(), RouteError>>;
}

/// A middleware built from a closure.
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware").field("name", &self.name).finish()
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut dyn ResponseSink) -> BoxFuture<'a, Result<(), RouteError>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn call<'a>(
        &'a self,
        request: &'a mut Request,
        response: &'a mut dyn ResponseSink,
    ) -> BoxFuture<'a, Result<(), RouteError>> {
        (self.func)(request, response)
    }
}

/// Wraps a closure as a [`BoxedMiddleware`].
pub fn middleware_fn<F>(name: &'static str, func: F) -> BoxedMiddleware
where
    F: for<'a> Fn(&'a mut Request, &'a mut dyn ResponseSink) -> BoxFuture<'a, Result<(), RouteError>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnMiddleware::new(name, func))
}
