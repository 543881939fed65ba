//! Adapter-normalized request view.

use http::{Extensions, Method};
use openroute_schema::UploadedFile;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::RouteError;

/// An inbound request as seen by a route.
///
/// Transport adapters build one per call. The router fills `params`, and the
/// pipeline replaces `params` and fills `data` with validated, cleaned values
/// before middlewares run.
///
/// # Example
///
/// ```
/// use openroute_core::Request;
/// use http::Method;
/// use serde_json::json;
///
/// let request = Request::new(Method::POST, "/articles")
///     .with_header("Authorization", "Bearer t0k3n")
///     .with_query("draft", "true")
///     .with_field("title", json!("A long enough title"));
///
/// assert_eq!(request.header("authorization"), Some("Bearer t0k3n"));
/// assert_eq!(request.query().get("draft"), Some(&json!("true")));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    pub(crate) params: Map<String, Value>,
    query: Map<String, Value>,
    headers: Map<String, Value>,
    body: Map<String, Value>,
    pub(crate) data: Value,
    extensions: Extensions,
}

impl Request {
    /// Creates a request with empty params, query, headers and body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Map::new(),
            query: Map::new(),
            headers: Map::new(),
            body: Map::new(),
            data: Value::Null,
            extensions: Extensions::new(),
        }
    }

    /// Adds a query string value.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Adds a header. Names are stored lowercase.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(
            name.as_ref().to_ascii_lowercase(),
            Value::String(value.into()),
        );
        self
    }

    /// Adds a parsed body field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.body.insert(name.into(), value);
        self
    }

    /// Adds an uploaded file as a body field.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, file: &UploadedFile) -> Self {
        self.body.insert(name.into(), file.to_value());
        self
    }

    /// Replaces the parsed body.
    ///
    /// Non-object bodies are ignored; only keyed bodies take part in
    /// validation.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        if let Value::Object(map) = body {
            self.body = map;
        }
        self
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path parameters.
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// A single path parameter as a string.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    /// Replaces the path parameters with the values bound by a router.
    pub fn set_params<I>(&mut self, params: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.params = params
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();
    }

    /// Query string values.
    #[must_use]
    pub fn query(&self) -> &Map<String, Value> {
        &self.query
    }

    /// Headers, keyed by lowercase name.
    #[must_use]
    pub fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }

    /// A header value, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(Value::as_str)
    }

    /// The parsed body as handed over by the adapter.
    #[must_use]
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Query and body merged, validated and cleaned against the request
    /// data schema.
    ///
    /// `Null` until the pipeline has run the request data stage.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Deserializes [`data`](Self::data) into a typed value.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, RouteError> {
        serde_json::from_value(self.data.clone()).map_err(|e| RouteError::validation(e.to_string()))
    }

    /// Deserializes the path parameters into a typed value.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, RouteError> {
        serde_json::from_value(Value::Object(self.params.clone()))
            .map_err(|e| RouteError::validation(e.to_string()))
    }

    /// Typed per-request storage, for values middlewares pass to handlers.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to the per-request storage.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Query values overlaid with body values; the body wins on conflicts.
    pub(crate) fn merged_input(&self) -> Map<String, Value> {
        let mut merged = self.query.clone();
        merged.extend(self.body.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_body_wins_over_query() {
        let request = Request::new(Method::POST, "/articles")
            .with_query("title", "from query")
            .with_query("page", "2")
            .with_field("title", json!("from body"));

        let merged = request.merged_input();
        assert_eq!(merged["title"], json!("from body"));
        assert_eq!(merged["page"], json!("2"));
    }

    #[test]
    fn test_set_params_replaces_existing() {
        let mut request = Request::new(Method::GET, "/articles/42/foo");
        request.set_params(vec![("stale".to_string(), "x".to_string())]);
        request.set_params(vec![
            ("id".to_string(), "42".to_string()),
            ("name".to_string(), "foo".to_string()),
        ]);

        assert_eq!(request.param("id"), Some("42"));
        assert_eq!(request.param("name"), Some("foo"));
        assert_eq!(request.param("stale"), None);
    }

    #[test]
    fn test_params_as_typed() {
        #[derive(Deserialize)]
        struct ArticleParams {
            id: String,
        }

        let mut request = Request::new(Method::GET, "/articles/42");
        request.set_params(vec![("id".to_string(), "42".to_string())]);
        let params: ArticleParams = request.params_as().unwrap();
        assert_eq!(params.id, "42");
    }

    #[test]
    fn test_with_body_ignores_non_objects() {
        let request = Request::new(Method::POST, "/").with_body(json!([1, 2]));
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_extensions_carry_values() {
        #[derive(Clone, Debug, PartialEq)]
        struct UserId(u64);

        let mut request = Request::new(Method::GET, "/");
        request.extensions_mut().insert(UserId(7));
        assert_eq!(request.extensions().get::<UserId>(), Some(&UserId(7)));
    }
}
