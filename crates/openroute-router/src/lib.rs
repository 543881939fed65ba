//! Segment trie router for OpenRoute.
//!
//! This crate indexes route values by path segment and HTTP method and
//! resolves an incoming `(method, path)` pair in time proportional to the
//! path depth, independent of how many routes are registered.
//!
//! # Features
//!
//! - **Literal and parameter segments**: `/articles/:id`
//! - **Literal precedence**: `/articles/home-screen` beats `/articles/:id`
//! - **Case-insensitive literals** and **trailing-slash equivalence**, both
//!   configurable through [`RouterOptions`]
//! - **Build-time conflict detection**: duplicate routes and ambiguous
//!   parameter names fail at insert time
//!
//! # Example
//!
//! ```rust
//! use openroute_router::{Router, MethodRouter};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert("/articles", MethodRouter::new().get("list")).unwrap();
//! router.insert("/articles/:id", MethodRouter::new().get("show")).unwrap();
//!
//! let found = router.match_route(&Method::GET, "/articles/7").unwrap();
//! assert_eq!(*found.route, "show");
//! assert_eq!(found.params.get("id"), Some("7"));
//! ```
//!
//! # Architecture
//!
//! ```text
//!                 (root)
//!                   │
//!               "articles"
//!            [GET, POST]
//!              ┌────┴─────────┐
//!              │              │
//!        "home-screen"      ":id"
//!            [GET]       [GET, DELETE]
//! ```

mod error;
mod method_router;
mod node;
mod params;
mod router;

pub use error::RouterError;
pub use method_router::{is_supported, MethodRouter, SUPPORTED_METHODS};
pub use node::{Node, SegmentKind};
pub use params::Params;
pub use router::{Router, RouterOptions};

/// A resolved route with its bound path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The stored route value
    pub route: &'a T,
    /// Bound path parameters
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(route: &'a T, params: Params) -> Self {
        Self { route, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_literal_beats_parameter() {
        let mut router = Router::new();
        router.route(&Method::GET, "/articles/:id", "byId").unwrap();
        router
            .route(&Method::GET, "/articles/home-screen", "home")
            .unwrap();

        let found = router
            .match_route(&Method::GET, "/articles/home-screen")
            .unwrap();
        assert_eq!(*found.route, "home");
    }

    #[test]
    fn test_insert_order_does_not_change_precedence() {
        let mut router = Router::new();
        router
            .route(&Method::GET, "/articles/home-screen", "home")
            .unwrap();
        router.route(&Method::GET, "/articles/:id", "byId").unwrap();

        let found = router
            .match_route(&Method::GET, "/articles/home-screen")
            .unwrap();
        assert_eq!(*found.route, "home");
        let found = router.match_route(&Method::GET, "/articles/9").unwrap();
        assert_eq!(*found.route, "byId");
    }
}
