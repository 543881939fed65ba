//! Segment trie node.
//!
//! Each node stands for one `/`-separated path segment. Literal children are
//! kept sorted for binary search and each node owns at most one parameter
//! child, so resolution cost depends on path depth only.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::error::RouterError;
use crate::method_router::MethodRouter;
use crate::params::Params;

/// Type of path segment in the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment (e.g., "articles")
    Static,
    /// Named parameter (e.g., ":id")
    Param(String),
}

/// A node in the segment trie.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// The path segment this node represents, as first registered
    pub segment: String,

    /// The kind of segment
    pub kind: SegmentKind,

    /// Method table for this node (if a route ends here)
    pub methods: Option<MethodRouter<T>>,

    /// Literal children, sorted for binary search
    pub static_children: Vec<Node<T>>,

    /// Parameter child (at most one per node)
    pub param_child: Option<Box<Node<T>>>,
}

/// Compares two literal segments, optionally ignoring ASCII case.
fn compare_segments(a: &str, b: &str, ignore_case: bool) -> Ordering {
    if ignore_case {
        a.bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
    } else {
        a.cmp(b)
    }
}

impl<T> Node<T> {
    /// Creates a new literal node.
    #[must_use]
    pub fn new_static(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            kind: SegmentKind::Static,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
        }
    }

    /// Creates a new parameter node.
    #[must_use]
    pub fn new_param(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            segment: format!(":{name}"),
            kind: SegmentKind::Param(name),
            methods: None,
            static_children: Vec::new(),
            param_child: None,
        }
    }

    /// Creates a root node for the trie.
    #[must_use]
    pub fn root() -> Self {
        Self::new_static("")
    }

    /// Splits a route pattern into segments.
    ///
    /// Empty segments are dropped, so `/a//b/` and `/a/b` are the same
    /// pattern.
    pub(crate) fn parse_path(path: &str) -> Result<Vec<(&str, SegmentKind)>, RouterError> {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some("") => Err(RouterError::EmptyParamName {
                    path: path.to_string(),
                }),
                Some(name) => Ok((s, SegmentKind::Param(name.to_string()))),
                None => Ok((s, SegmentKind::Static)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        // A repeated name would bind two values to one key.
        let mut seen: Vec<&str> = Vec::new();
        for (_, kind) in &segments {
            if let SegmentKind::Param(name) = kind {
                if seen.contains(&name.as_str()) {
                    return Err(RouterError::DuplicateParam {
                        path: path.to_string(),
                        name: name.clone(),
                    });
                }
                seen.push(name);
            }
        }
        Ok(segments)
    }

    /// Inserts a method table at `path`.
    pub fn insert(
        &mut self,
        path: &str,
        methods: MethodRouter<T>,
        ignore_case: bool,
    ) -> Result<(), RouterError> {
        let segments = Self::parse_path(path)?;
        self.insert_segments(path, &segments, methods, ignore_case)
    }

    fn insert_segments(
        &mut self,
        path: &str,
        segments: &[(&str, SegmentKind)],
        methods: MethodRouter<T>,
        ignore_case: bool,
    ) -> Result<(), RouterError> {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            return match &mut self.methods {
                Some(existing) => {
                    existing
                        .merge(methods)
                        .map_err(|method| RouterError::DuplicateRoute {
                            method,
                            path: path.to_string(),
                        })
                }
                None => {
                    self.methods = Some(methods);
                    Ok(())
                }
            };
        };

        match kind {
            SegmentKind::Static => {
                let index = match self
                    .static_children
                    .binary_search_by(|c| compare_segments(&c.segment, segment, ignore_case))
                {
                    Ok(index) => index,
                    Err(index) => {
                        self.static_children.insert(index, Node::new_static(*segment));
                        index
                    }
                };
                self.static_children[index].insert_segments(path, remaining, methods, ignore_case)
            }
            SegmentKind::Param(name) => {
                let child = self
                    .param_child
                    .get_or_insert_with(|| Box::new(Node::new_param(name.clone())));
                if let SegmentKind::Param(existing) = &child.kind {
                    if existing != name {
                        return Err(RouterError::ParamConflict {
                            path: path.to_string(),
                            existing: existing.clone(),
                            new: name.clone(),
                        });
                    }
                }
                child.insert_segments(path, remaining, methods, ignore_case)
            }
        }
    }

    /// Matches a request path against the trie.
    ///
    /// Returns the method table and bound parameters if a route ends at the
    /// matched node.
    #[must_use]
    pub fn match_path(&self, path: &str, ignore_case: bool) -> Option<(&MethodRouter<T>, Params)> {
        let segments: SmallVec<[&str; 8]> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params, ignore_case)?;
        Some((methods, params))
    }

    fn match_segments<'a>(
        &'a self,
        segments: &[&str],
        params: &mut Params,
        ignore_case: bool,
    ) -> Option<&'a MethodRouter<T>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        // Literal children always win over the parameter child.
        if let Some(child) = self.find_static_child(segment, ignore_case) {
            if let Some(found) = child.match_segments(remaining, params, ignore_case) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.as_str(), *segment);
                if let Some(found) = child.match_segments(remaining, params, ignore_case) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        None
    }

    fn find_static_child(&self, segment: &str, ignore_case: bool) -> Option<&Node<T>> {
        self.static_children
            .binary_search_by(|c| compare_segments(&c.segment, segment, ignore_case))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_parse_path_segments() {
        let segments = Node::<()>::parse_path("/articles/:id/").unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], ("articles", SegmentKind::Static));
        assert_eq!(segments[1], (":id", SegmentKind::Param("id".to_string())));
    }

    #[test]
    fn test_parse_path_rejects_empty_param() {
        let err = Node::<()>::parse_path("/articles/:").unwrap_err();
        assert!(matches!(err, RouterError::EmptyParamName { .. }));
    }

    #[test]
    fn test_parse_path_rejects_repeated_param() {
        let err = Node::<()>::parse_path("/a/:id/b/:id").unwrap_err();
        assert_eq!(
            err,
            RouterError::DuplicateParam {
                path: "/a/:id/b/:id".to_string(),
                name: "id".to_string(),
            }
        );
    }

    #[test]
    fn test_static_priority_over_param() {
        let mut root = Node::root();
        root.insert("/articles/:id", MethodRouter::new().get("byId"), true)
            .unwrap();
        root.insert("/articles/home-screen", MethodRouter::new().get("home"), true)
            .unwrap();

        let (methods, params) = root.match_path("/articles/home-screen", true).unwrap();
        assert_eq!(methods.get_route(&Method::GET), Some(&"home"));
        assert!(params.is_empty());

        let (methods, params) = root.match_path("/articles/17", true).unwrap();
        assert_eq!(methods.get_route(&Method::GET), Some(&"byId"));
        assert_eq!(params.get("id"), Some("17"));
    }

    #[test]
    fn test_failed_literal_branch_falls_back_to_param() {
        let mut root = Node::root();
        root.insert("/a/b/c", MethodRouter::new().get("literal"), true)
            .unwrap();
        root.insert("/a/:x/d", MethodRouter::new().get("param"), true)
            .unwrap();

        let (methods, params) = root.match_path("/a/b/d", true).unwrap();
        assert_eq!(methods.get_route(&Method::GET), Some(&"param"));
        assert_eq!(params.get("x"), Some("b"));
    }

    #[test]
    fn test_backtracking_drops_stale_params() {
        let mut root = Node::root();
        root.insert("/:a/lit/:c/z", MethodRouter::new().get("dead-end"), true)
            .unwrap();
        root.insert("/:a/:b/q/w", MethodRouter::new().get("target"), true)
            .unwrap();

        let (methods, params) = root.match_path("/one/lit/q/w", true).unwrap();
        assert_eq!(methods.get_route(&Method::GET), Some(&"target"));
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a"), Some("one"));
        assert_eq!(params.get("b"), Some("lit"));
        assert_eq!(params.get("c"), None);
    }

    #[test]
    fn test_param_name_conflict() {
        let mut root = Node::root();
        root.insert("/users/:id", MethodRouter::new().get(1), true)
            .unwrap();
        let err = root
            .insert("/users/:userId/posts", MethodRouter::new().get(2), true)
            .unwrap_err();

        assert_eq!(
            err,
            RouterError::ParamConflict {
                path: "/users/:userId/posts".to_string(),
                existing: "id".to_string(),
                new: "userId".to_string(),
            }
        );
    }

    #[test]
    fn test_case_insensitive_literals() {
        let mut root = Node::root();
        root.insert("/Articles", MethodRouter::new().get("list"), true)
            .unwrap();

        assert!(root.match_path("/articles", true).is_some());
        assert!(root.match_path("/ARTICLES", true).is_some());
    }

    #[test]
    fn test_case_sensitive_literals() {
        let mut root = Node::root();
        root.insert("/Articles", MethodRouter::new().get("list"), false)
            .unwrap();

        assert!(root.match_path("/Articles", false).is_some());
        assert!(root.match_path("/articles", false).is_none());
    }

    #[test]
    fn test_root_route() {
        let mut root = Node::root();
        root.insert("/", MethodRouter::new().get("index"), true)
            .unwrap();

        let (methods, _) = root.match_path("/", true).unwrap();
        assert_eq!(methods.get_route(&Method::GET), Some(&"index"));
        assert!(root.match_path("/other", true).is_none());
    }
}
