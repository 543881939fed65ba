//! In-memory test client.

use std::sync::Arc;

use http::Method;
use openroute_core::{BufferedResponse, BuildError, Dispatcher, Request, RouteDescriptor};
use openroute_schema::UploadedFile;
use serde::Serialize;
use serde_json::Value;

use crate::error::TestError;
use crate::response::TestResponse;

/// Drives a [`Dispatcher`] without a transport.
///
/// # Example
///
/// ```
/// use openroute_core::{route, BuildOptions, Request, RouteError};
/// use openroute_schema::Schema;
/// use openroute_test::TestClient;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let echo = route()
///     .set_path("POST", "/echo")
///     .set_request_data(Schema::object().property("msg", Schema::string()))
///     .set_handle(|req: Request| async move { Ok::<_, RouteError>(req.data().clone()) })
///     .build(BuildOptions::default())
///     .unwrap();
///
/// let client = TestClient::from_routes([echo]).unwrap();
/// let response = client.post("/echo").json(&json!({ "msg": "hi" })).send().await;
///
/// assert_eq!(response.status_code(), 200);
/// assert_eq!(response.json::<serde_json::Value>().unwrap(), json!({ "msg": "hi" }));
/// # });
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct TestClient {
    dispatcher: Arc<Dispatcher>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Creates a client over an existing dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            default_headers: Vec::new(),
        }
    }

    /// Builds a dispatcher from `routes` with default options.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Router` if the routes conflict.
    pub fn from_routes(
        routes: impl IntoIterator<Item = RouteDescriptor>,
    ) -> Result<Self, BuildError> {
        Ok(Self::new(Dispatcher::new(routes)?))
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The dispatcher behind this client.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Creates a GET request builder.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Creates a POST request builder.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Creates a PUT request builder.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Creates a PATCH request builder.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Creates a DELETE request builder.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Creates an OPTIONS request builder.
    pub fn options(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::OPTIONS, uri)
    }

    /// Creates a request builder with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, method, uri.as_ref())
    }
}

/// A request builder bound to a test client.
#[must_use]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    request: Request,
    error: Option<TestError>,
}

impl<'a> TestClientRequest<'a> {
    fn new(client: &'a TestClient, method: Method, uri: &str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        let mut request = Request::new(method, path);
        let mut error = None;

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            match (decode(name), decode(value)) {
                (Ok(name), Ok(value)) => request = request.with_query(name, value),
                (Err(e), _) | (_, Err(e)) => {
                    error.get_or_insert(e);
                }
            }
        }

        for (name, value) in &client.default_headers {
            request = request.with_header(name, value.clone());
        }

        Self {
            client,
            request,
            error,
        }
    }

    /// Sets a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.request = self.request.with_header(name, value);
        self
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.header("authorization", value)
    }

    /// Adds a query string value.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request = self.request.with_query(name, value);
        self
    }

    /// Adds every field of a JSON object to the body.
    ///
    /// A value that does not serialize to an object makes `send` fail.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::Object(fields)) => {
                for (name, field) in fields {
                    self.request = self.request.with_field(name, field);
                }
            }
            Ok(other) => {
                self.error.get_or_insert(TestError::RequestBuild(format!(
                    "json body must be an object, got {other}"
                )));
            }
            Err(e) => {
                self.error.get_or_insert(e.into());
            }
        }
        self
    }

    /// Adds one body field.
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.request = self.request.with_field(name, value);
        self
    }

    /// Adds an uploaded file as a body field.
    pub fn file(mut self, name: impl Into<String>, file: &UploadedFile) -> Self {
        self.request = self.request.with_file(name, file);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built; use
    /// [`try_send`](Self::try_send) to get the error instead.
    pub async fn send(self) -> TestResponse {
        self.try_send().await.expect("request should succeed")
    }

    /// Sends the request and returns a Result.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut response = BufferedResponse::new();
        self.client
            .dispatcher
            .dispatch(self.request, &mut response)
            .await;
        TestResponse::from_http(response.into_http()).await
    }
}

fn decode(raw: &str) -> Result<String, TestError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| TestError::RequestBuild(format!("invalid query string: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use openroute_core::{route, BuildOptions, RouteError};
    use openroute_schema::Schema;
    use serde_json::json;

    fn echo_route(method: &str, path: &str) -> RouteDescriptor {
        route()
            .set_path(method, path)
            .set_handle(|req: Request| async move {
                Ok::<_, RouteError>(json!({
                    "method": req.method().as_str(),
                    "path": req.path(),
                    "query": req.query(),
                    "headers": req.headers(),
                    "body": req.body(),
                }))
            })
            .build(BuildOptions::default())
            .unwrap()
    }

    #[tokio::test]
    async fn test_query_string_is_decoded() {
        let client = TestClient::from_routes([echo_route("GET", "/search")]).unwrap();
        let response = client.get("/search?q=hello%20world&tag=a+b&flag").send().await;

        let body: Value = response.json().unwrap();
        assert_eq!(body["path"], json!("/search"));
        assert_eq!(
            body["query"],
            json!({ "q": "hello world", "tag": "a b", "flag": "" })
        );
    }

    #[tokio::test]
    async fn test_headers_and_default_headers() {
        let client = TestClient::from_routes([echo_route("GET", "/me")])
            .unwrap()
            .with_default_header("X-Client", "tests");
        let response = client.get("/me").bearer_token("t0k3n").send().await;

        let body: Value = response.json().unwrap();
        assert_eq!(body["headers"]["x-client"], json!("tests"));
        assert_eq!(body["headers"]["authorization"], json!("Bearer t0k3n"));
    }

    #[tokio::test]
    async fn test_json_and_fields_merge_into_body() {
        let client = TestClient::from_routes([echo_route("PATCH", "/articles")]).unwrap();
        let response = client
            .patch("/articles")
            .json(&json!({ "title": "A title" }))
            .field("draft", json!(true))
            .send()
            .await;

        let body: Value = response.json().unwrap();
        assert_eq!(body["method"], json!("PATCH"));
        assert_eq!(body["body"], json!({ "title": "A title", "draft": true }));
    }

    #[tokio::test]
    async fn test_file_field() {
        let upload = route()
            .set_path("POST", "/avatars")
            .set_request_data(
                Schema::object().property("avatar", Schema::file().extensions(["png"])),
            )
            .set_handle(|req: Request| async move {
                Ok::<_, RouteError>(json!({ "name": req.data()["avatar"]["filename"] }))
            })
            .build(BuildOptions::default())
            .unwrap();
        let client = TestClient::from_routes([upload]).unwrap();

        let png = UploadedFile::new("me.png", "image/png", 1024);
        let response = client.post("/avatars").file("avatar", &png).send().await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Value>().unwrap(), json!({ "name": "me.png" }));

        let gif = UploadedFile::new("me.gif", "image/gif", 1024);
        let response = client.post("/avatars").file("avatar", &gif).send().await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_object_json_is_build_error() {
        let client = TestClient::from_routes([echo_route("POST", "/x")]).unwrap();
        let err = client.post("/x").json(&json!([1, 2])).try_send().await.unwrap_err();
        assert!(matches!(err, TestError::RequestBuild(_)));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let client = TestClient::from_routes([echo_route("GET", "/x")]).unwrap();
        let response = client.delete("/x").send().await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.text().unwrap(), "404 Not Found!");
    }
}
