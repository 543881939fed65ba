//! Per-path method table.
//!
//! [`MethodRouter`] maps each of the six supported HTTP methods to one stored
//! route value for a single path.

use http::Method;

/// The methods a route may be registered under.
pub const SUPPORTED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Returns true if `method` is one of [`SUPPORTED_METHODS`].
#[must_use]
pub fn is_supported(method: &Method) -> bool {
    SUPPORTED_METHODS.contains(method)
}

/// Maps HTTP methods to route values for one path.
///
/// # Example
///
/// ```rust
/// use openroute_router::MethodRouter;
/// use http::Method;
///
/// let router = MethodRouter::new().get("listArticles").post("createArticle");
///
/// assert_eq!(router.get_route(&Method::GET), Some(&"listArticles"));
/// assert_eq!(router.get_route(&Method::POST), Some(&"createArticle"));
/// assert_eq!(router.get_route(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    get: Option<T>,
    post: Option<T>,
    put: Option<T>,
    patch: Option<T>,
    delete: Option<T>,
    options: Option<T>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            get: None,
            post: None,
            put: None,
            patch: None,
            delete: None,
            options: None,
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates a new empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET route.
    #[must_use]
    pub fn get(mut self, route: T) -> Self {
        self.get = Some(route);
        self
    }

    /// Registers a POST route.
    #[must_use]
    pub fn post(mut self, route: T) -> Self {
        self.post = Some(route);
        self
    }

    /// Registers a PUT route.
    #[must_use]
    pub fn put(mut self, route: T) -> Self {
        self.put = Some(route);
        self
    }

    /// Registers a PATCH route.
    #[must_use]
    pub fn patch(mut self, route: T) -> Self {
        self.patch = Some(route);
        self
    }

    /// Registers a DELETE route.
    #[must_use]
    pub fn delete(mut self, route: T) -> Self {
        self.delete = Some(route);
        self
    }

    /// Registers an OPTIONS route.
    #[must_use]
    pub fn options(mut self, route: T) -> Self {
        self.options = Some(route);
        self
    }

    /// Registers a route for `method`.
    ///
    /// Methods outside [`SUPPORTED_METHODS`] are ignored.
    #[must_use]
    pub fn method(mut self, method: &Method, route: T) -> Self {
        if let Some(slot) = self.slot_mut(method) {
            *slot = Some(route);
        }
        self
    }

    /// Returns the route registered for `method`.
    #[must_use]
    pub fn get_route(&self, method: &Method) -> Option<&T> {
        match *method {
            Method::GET => self.get.as_ref(),
            Method::POST => self.post.as_ref(),
            Method::PUT => self.put.as_ref(),
            Method::PATCH => self.patch.as_ref(),
            Method::DELETE => self.delete.as_ref(),
            Method::OPTIONS => self.options.as_ref(),
            _ => None,
        }
    }

    fn slot_mut(&mut self, method: &Method) -> Option<&mut Option<T>> {
        match *method {
            Method::GET => Some(&mut self.get),
            Method::POST => Some(&mut self.post),
            Method::PUT => Some(&mut self.put),
            Method::PATCH => Some(&mut self.patch),
            Method::DELETE => Some(&mut self.delete),
            Method::OPTIONS => Some(&mut self.options),
            _ => None,
        }
    }

    fn into_slots(self) -> [(Method, Option<T>); 6] {
        [
            (Method::GET, self.get),
            (Method::POST, self.post),
            (Method::PUT, self.put),
            (Method::PATCH, self.patch),
            (Method::DELETE, self.delete),
            (Method::OPTIONS, self.options),
        ]
    }

    /// Merges another method router into this one.
    ///
    /// Fails with the first method that is registered on both sides. On
    /// failure `self` keeps every entry merged before the conflict.
    pub fn merge(&mut self, other: MethodRouter<T>) -> Result<(), Method> {
        for (method, route) in other.into_slots() {
            let Some(route) = route else { continue };
            if let Some(slot) = self.slot_mut(&method) {
                if slot.is_some() {
                    return Err(method);
                }
                *slot = Some(route);
            }
        }
        Ok(())
    }

    /// Returns true if any method is registered.
    #[must_use]
    pub fn has_any_method(&self) -> bool {
        SUPPORTED_METHODS
            .iter()
            .any(|m| self.get_route(m).is_some())
    }

    /// Returns the registered methods in canonical order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        SUPPORTED_METHODS
            .iter()
            .filter(|m| self.get_route(m).is_some())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_router_new_is_empty() {
        let router: MethodRouter<&str> = MethodRouter::new();
        assert!(!router.has_any_method());
        assert!(router.allowed_methods().is_empty());
    }

    #[test]
    fn test_method_router_all_verbs() {
        let router = MethodRouter::new()
            .get(1)
            .post(2)
            .put(3)
            .patch(4)
            .delete(5)
            .options(6);

        assert_eq!(router.get_route(&Method::GET), Some(&1));
        assert_eq!(router.get_route(&Method::POST), Some(&2));
        assert_eq!(router.get_route(&Method::PUT), Some(&3));
        assert_eq!(router.get_route(&Method::PATCH), Some(&4));
        assert_eq!(router.get_route(&Method::DELETE), Some(&5));
        assert_eq!(router.get_route(&Method::OPTIONS), Some(&6));
        assert_eq!(router.get_route(&Method::HEAD), None);
    }

    #[test]
    fn test_method_router_ignores_unsupported() {
        let router = MethodRouter::new().method(&Method::TRACE, "trace");
        assert!(!router.has_any_method());
    }

    #[test]
    fn test_method_router_merge_adds_methods() {
        let mut router = MethodRouter::new().get("list");
        router.merge(MethodRouter::new().post("create")).unwrap();

        assert_eq!(
            router.allowed_methods(),
            vec![Method::GET, Method::POST]
        );
    }

    #[test]
    fn test_method_router_merge_reports_conflict() {
        let mut router = MethodRouter::new().get("first");
        let err = router.merge(MethodRouter::new().get("second")).unwrap_err();

        assert_eq!(err, Method::GET);
        assert_eq!(router.get_route(&Method::GET), Some(&"first"));
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(&Method::PATCH));
        assert!(!is_supported(&Method::HEAD));
        assert!(!is_supported(&Method::CONNECT));
    }
}
