//! High-level router API.
//!
//! [`Router`] is built once from a fixed set of routes and is read-only while
//! serving requests.

use http::Method;

use crate::error::RouterError;
use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::RouteMatch;

/// Matching behaviour shared by every route in a [`Router`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterOptions {
    /// Compare literal segments without regard to ASCII case.
    pub ignore_case: bool,
    /// Treat `/path/` as the same route as `/path`.
    pub trailing_slash: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            ignore_case: true,
            trailing_slash: true,
        }
    }
}

/// A segment trie router mapping `(method, path)` to stored route values.
///
/// # Example
///
/// ```rust
/// use openroute_router::{Router, MethodRouter};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.insert("/articles", MethodRouter::new().get("list").post("create")).unwrap();
/// router.insert("/articles/:id", MethodRouter::new().get("show")).unwrap();
///
/// let found = router.match_route(&Method::GET, "/articles/42").unwrap();
/// assert_eq!(*found.route, "show");
/// assert_eq!(found.params.get("id"), Some("42"));
/// ```
///
/// # Route Priority
///
/// A literal segment (`/articles/home-screen`) always wins over a parameter
/// segment (`/articles/:id`) at the same depth. If the literal branch fails
/// deeper down, matching falls back to the parameter branch.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    options: RouterOptions,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a new empty router with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    /// Creates a new empty router with explicit options.
    #[must_use]
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            root: Node::root(),
            options,
            route_count: 0,
        }
    }

    /// Returns the matching options in effect.
    #[must_use]
    pub fn options(&self) -> RouterOptions {
        self.options
    }

    /// Inserts a method table at `path`.
    ///
    /// Tables for the same path are merged. Registering a method twice for
    /// one path, or binding a differently named parameter where another one
    /// already sits, is an error.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) -> Result<(), RouterError> {
        let added = methods.allowed_methods().len();
        self.root.insert(path, methods, self.options.ignore_case)?;
        self.route_count += added;
        Ok(())
    }

    /// Convenience method to add a single-method route.
    pub fn route(&mut self, method: &Method, path: &str, route: T) -> Result<(), RouterError> {
        self.insert(path, MethodRouter::new().method(method, route))
    }

    /// Resolves `(method, path)` to a route and its bound parameters.
    ///
    /// A path that matches but has nothing registered for `method` resolves
    /// to `None` just like an unknown path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let (methods, params) = self.match_path(path)?;
        let route = methods.get_route(method)?;
        Some(RouteMatch::new(route, params))
    }

    /// Resolves a path without looking at the method.
    ///
    /// Useful for listing the methods registered at a path.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let path = path.split(|c| c == '?' || c == '#').next().unwrap_or(path);
        if !self.options.trailing_slash && path.len() > 1 && path.ends_with('/') {
            return None;
        }
        self.root.match_path(path, self.options.ignore_case)
    }

    /// Returns the number of `(method, path)` routes registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
