//! Request dispatch over a fixed set of routes.

use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Method, StatusCode};
use openroute_router::{Params, Router, RouterOptions};

use crate::error::BuildError;
use crate::request::Request;
use crate::response::ResponseSink;
use crate::route::RouteDescriptor;

/// Body written when no route matches.
pub const DEFAULT_NOT_FOUND_BODY: &str = "404 Not Found!";

/// Options for a [`Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherOptions {
    /// Path matching options.
    pub router: RouterOptions,
    /// Plain-text body for unmatched requests.
    pub not_found_body: String,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            router: RouterOptions::default(),
            not_found_body: DEFAULT_NOT_FOUND_BODY.to_string(),
        }
    }
}

impl DispatcherOptions {
    /// Sets the path matching options.
    #[must_use]
    pub const fn router(mut self, router: RouterOptions) -> Self {
        self.router = router;
        self
    }

    /// Sets the body written for unmatched requests.
    #[must_use]
    pub fn not_found_body(mut self, body: impl Into<String>) -> Self {
        self.not_found_body = body.into();
        self
    }
}

/// Routes requests to built [`RouteDescriptor`]s by method and path.
///
/// Built once, then shared read-only. An unknown path or a known path with
/// an unregistered method both get a plain-text `404`.
///
/// # Example
///
/// ```
/// use openroute_core::{route, BuildOptions, BufferedResponse, Dispatcher, Request, RouteError};
/// use openroute_schema::Schema;
/// use http::{Method, StatusCode};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let show = route()
///     .set_path("GET", "/articles/:id")
///     .set_params(Schema::object().property("id", Schema::string()))
///     .set_handle(|req: Request| async move {
///         Ok::<_, RouteError>(json!({ "id": req.param("id") }))
///     })
///     .build(BuildOptions::default())
///     .unwrap();
///
/// let dispatcher = Dispatcher::new([show]).unwrap();
/// let mut response = BufferedResponse::new();
/// dispatcher
///     .dispatch(Request::new(Method::GET, "/articles/42"), &mut response)
///     .await;
///
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.json().unwrap(), json!({ "id": "42" }));
/// # });
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    router: Router<RouteDescriptor>,
    routes: Vec<RouteDescriptor>,
    not_found_body: String,
}

impl Dispatcher {
    /// Creates a dispatcher with default options.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Router`] if two routes share a method and path,
    /// or name a parameter differently at the same position.
    pub fn new(routes: impl IntoIterator<Item = RouteDescriptor>) -> Result<Self, BuildError> {
        Self::with_options(routes, DispatcherOptions::default())
    }

    /// Creates a dispatcher with explicit options.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::new`].
    pub fn with_options(
        routes: impl IntoIterator<Item = RouteDescriptor>,
        options: DispatcherOptions,
    ) -> Result<Self, BuildError> {
        let mut router = Router::with_options(options.router);
        let routes: Vec<RouteDescriptor> = routes.into_iter().collect();
        for descriptor in &routes {
            router.route(&descriptor.method(), descriptor.path(), descriptor.clone())?;
        }

        tracing::info!(
            routes = routes.len(),
            ignore_case = options.router.ignore_case,
            trailing_slash = options.router.trailing_slash,
            "dispatcher ready"
        );

        Ok(Self {
            router,
            routes,
            not_found_body: options.not_found_body,
        })
    }

    /// The registered routes, in registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Finds the route for `method` and `path`, with its bound parameters.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<(RouteDescriptor, Params)> {
        self.router
            .match_route(method, path)
            .map(|m| (m.route.clone(), m.params))
    }

    /// Methods registered for `path`, or `None` if no route has that path.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Option<Vec<Method>> {
        self.router
            .match_path(path)
            .map(|(methods, _)| methods.allowed_methods())
    }

    /// Binds path parameters and runs the matching route, or writes a
    /// `404` if there is none.
    pub async fn dispatch(&self, mut request: Request, response: &mut dyn ResponseSink) {
        let Some((descriptor, params)) = self.resolve(request.method(), request.path()) else {
            tracing::debug!(
                method = %request.method(),
                path = request.path(),
                "no route matched"
            );
            self.not_found(response);
            return;
        };

        request.set_params(params);
        descriptor.execute(request, response).await;
    }

    fn not_found(&self, response: &mut dyn ResponseSink) {
        response.set_status(StatusCode::NOT_FOUND);
        response.set_header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response.write(self.not_found_body.as_bytes());
        response.end();
    }
}

#[cfg(test)]
mod tests {
    use openroute_router::RouterError;
    use openroute_schema::Schema;
    use serde_json::json;

    use super::*;
    use crate::error::RouteError;
    use crate::response::BufferedResponse;
    use crate::route::{route, BuildOptions};

    fn echo(method: &str, path: &str) -> RouteDescriptor {
        let tag = format!("{method} {path}");
        let mut builder = route().set_path(method, path);
        let names: Vec<String> = path
            .split('/')
            .filter_map(|s| s.strip_prefix(':'))
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            let schema = names
                .iter()
                .fold(Schema::object(), |s, n| s.property(n.clone(), Schema::string()));
            builder = builder.set_params(schema);
        }
        builder
            .set_handle(move |req: Request| {
                let tag = tag.clone();
                async move { Ok::<_, RouteError>(json!({ "route": tag, "params": req.params() })) }
            })
            .build(BuildOptions::default())
            .unwrap()
    }

    async fn send(dispatcher: &Dispatcher, method: Method, path: &str) -> BufferedResponse {
        let mut response = BufferedResponse::new();
        dispatcher
            .dispatch(Request::new(method, path), &mut response)
            .await;
        response
    }

    #[tokio::test]
    async fn test_dispatch_binds_params() {
        let dispatcher = Dispatcher::new([
            echo("GET", "/articles"),
            echo("GET", "/articles/:id"),
            echo("DELETE", "/articles/:id"),
        ])
        .unwrap();

        let response = send(&dispatcher, Method::DELETE, "/articles/9").await;
        assert_eq!(
            response.json().unwrap(),
            json!({ "route": "DELETE /articles/:id", "params": { "id": "9" } })
        );
    }

    #[tokio::test]
    async fn test_literal_beats_param() {
        let dispatcher =
            Dispatcher::new([echo("GET", "/users/:id"), echo("GET", "/users/me")]).unwrap();

        let response = send(&dispatcher, Method::GET, "/users/me").await;
        assert_eq!(response.json().unwrap()["route"], json!("GET /users/me"));

        let response = send(&dispatcher, Method::GET, "/users/7").await;
        assert_eq!(response.json().unwrap()["route"], json!("GET /users/:id"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let dispatcher = Dispatcher::new([echo("GET", "/articles")]).unwrap();

        let response = send(&dispatcher, Method::GET, "/nothing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.text(), DEFAULT_NOT_FOUND_BODY);
    }

    #[tokio::test]
    async fn test_method_mismatch_is_not_found() {
        let dispatcher = Dispatcher::new([echo("GET", "/articles")]).unwrap();

        let response = send(&dispatcher, Method::POST, "/articles").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            dispatcher.allowed_methods("/articles"),
            Some(vec![Method::GET])
        );
        assert_eq!(dispatcher.allowed_methods("/missing"), None);
    }

    #[tokio::test]
    async fn test_custom_not_found_body() {
        let options = DispatcherOptions::default().not_found_body("nope");
        let dispatcher = Dispatcher::with_options([echo("GET", "/a")], options).unwrap();

        let response = send(&dispatcher, Method::GET, "/b").await;
        assert_eq!(response.text(), "nope");
    }

    #[tokio::test]
    async fn test_case_sensitive_option() {
        let options = DispatcherOptions::default().router(RouterOptions {
            ignore_case: false,
            trailing_slash: true,
        });
        let dispatcher = Dispatcher::with_options([echo("GET", "/Articles")], options).unwrap();

        assert_eq!(
            send(&dispatcher, Method::GET, "/articles").await.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            send(&dispatcher, Method::GET, "/Articles/").await.status(),
            StatusCode::OK
        );
    }

    #[test]
    fn test_duplicate_routes_rejected() {
        let err = Dispatcher::new([echo("GET", "/a"), echo("GET", "/a")]).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Router(RouterError::DuplicateRoute { .. })
        ));
    }

    #[test]
    fn test_routes_keep_registration_order() {
        let dispatcher = Dispatcher::new([echo("POST", "/b"), echo("GET", "/a")]).unwrap();
        let paths: Vec<_> = dispatcher.routes().iter().map(RouteDescriptor::path).collect();
        assert_eq!(paths, vec!["/b", "/a"]);
    }
}
