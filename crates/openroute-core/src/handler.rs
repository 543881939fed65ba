//! Terminal request handlers.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::RouteError;
use crate::middleware::BoxFuture;
use crate::request::Request;

/// The terminal handler of a route.
///
/// Implemented for any async function or closure taking the [`Request`] and
/// returning `Result<T, E>` where `T` serializes and `E` converts into a
/// [`RouteError`]. The result is validated against the route's response
/// schema before it is written.
///
/// # Example
///
/// ```
/// use openroute_core::{Request, RouteError};
///
/// async fn list_articles(_req: Request) -> Result<Vec<String>, RouteError> {
///     Ok(Vec::new())
/// }
///
/// let _route = openroute_core::route()
///     .set_path("GET", "/articles")
///     .set_handle(list_articles);
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Runs the handler, producing the JSON result.
    fn call(&self, request: Request) -> BoxFuture<'static, Result<Value, RouteError>>;
}

impl<F, Fut, T, E> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize,
    E: Into<RouteError>,
{
    fn call(&self, request: Request) -> BoxFuture<'static, Result<Value, RouteError>> {
        let fut = (self)(request);
        Box::pin(async move {
            let result = fut.await.map_err(Into::into)?;
            serde_json::to_value(result).map_err(|e| {
                RouteError::internal_with_source("Handler result could not be serialized", e)
            })
        })
    }
}

/// A type-erased handler stored in a route.
pub type BoxedHandler = Arc<dyn Handler>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[tokio::test]
    async fn test_closure_handler_serializes_result() {
        let handler: BoxedHandler = Arc::new(|req: Request| async move {
            Ok::<_, RouteError>(serde_json::json!({ "path": req.path() }))
        });

        let value = handler
            .call(Request::new(Method::GET, "/articles"))
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!({ "path": "/articles" }));
    }

    #[tokio::test]
    async fn test_handler_error_converts() {
        let handler: BoxedHandler = Arc::new(|_req: Request| async move {
            Err::<(), _>(anyhow::anyhow!("boom"))
        });

        let err = handler
            .call(Request::new(Method::GET, "/"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal server error");
    }
}
