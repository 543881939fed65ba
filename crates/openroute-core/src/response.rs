//! Response sinks.
//!
//! The pipeline writes through the [`ResponseSink`] trait so any transport
//! can plug in. [`BufferedResponse`] is the in-memory implementation.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

/// A write-once response target.
///
/// Once [`end`](Self::end) has been called the sink is finished and further
/// writes are a programming error; callers check
/// [`is_finished`](Self::is_finished) before writing.
pub trait ResponseSink: Send {
    /// Sets the status code.
    fn set_status(&mut self, status: StatusCode);

    /// Sets a header, replacing any previous value.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Appends bytes to the body.
    fn write(&mut self, chunk: &[u8]);

    /// Discards body bytes written so far. No-op once finished.
    fn clear_body(&mut self);

    /// Finishes the response.
    fn end(&mut self);

    /// Returns true once the response has been finished.
    fn is_finished(&self) -> bool;

    /// Writes a complete JSON response and finishes it.
    fn send_json(&mut self, status: StatusCode, body: &serde_json::Value) {
        self.set_status(status);
        self.set_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.write(body.to_string().as_bytes());
        self.end();
    }
}

/// A response collected in memory.
///
/// # Example
///
/// ```
/// use openroute_core::{BufferedResponse, ResponseSink};
/// use http::StatusCode;
///
/// let mut response = BufferedResponse::new();
/// response.send_json(StatusCode::CREATED, &serde_json::json!({ "id": 1 }));
///
/// assert!(response.is_finished());
/// assert_eq!(response.status(), StatusCode::CREATED);
/// assert_eq!(response.text(), r#"{"id":1}"#);
/// ```
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    finished: bool,
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferedResponse {
    /// Creates an empty, unfinished response with status 200.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            finished: false,
        }
    }

    /// The status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as UTF-8 text (lossy).
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The body parsed as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Converts into an `http::Response`.
    #[must_use]
    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for BufferedResponse {
    fn set_status(&mut self, status: StatusCode) {
        if self.finished {
            tracing::warn!(%status, "status set on a finished response");
            return;
        }
        self.status = status;
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.finished {
            tracing::warn!(header = %name, "header set on a finished response");
            return;
        }
        self.headers.insert(name, value);
    }

    fn write(&mut self, chunk: &[u8]) {
        if self.finished {
            tracing::warn!(bytes = chunk.len(), "write to a finished response dropped");
            return;
        }
        self.body.extend_from_slice(chunk);
    }

    fn clear_body(&mut self) {
        if !self.finished {
            self.body.clear();
        }
    }

    fn end(&mut self) {
        self.finished = true;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_writes_after_end_are_dropped() {
        let mut response = BufferedResponse::new();
        response.write(b"first");
        response.end();
        response.write(b"second");
        response.set_status(StatusCode::IM_A_TEAPOT);

        assert_eq!(response.text(), "first");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_clear_body_only_before_end() {
        let mut response = BufferedResponse::new();
        response.write(b"{\"partial\":");
        response.clear_body();
        assert!(response.body().is_empty());

        response.write(b"done");
        response.end();
        response.clear_body();
        assert_eq!(response.text(), "done");
    }

    #[test]
    fn test_send_json_sets_content_type() {
        let mut response = BufferedResponse::new();
        response.send_json(StatusCode::BAD_REQUEST, &serde_json::json!({ "error": "nope" }));

        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(response.json().unwrap(), serde_json::json!({ "error": "nope" }));
    }

    #[tokio::test]
    async fn test_into_http() {
        let mut response = BufferedResponse::new();
        response.set_status(StatusCode::NOT_FOUND);
        response.write(b"404 Not Found!");
        response.end();

        let http = response.into_http();
        assert_eq!(http.status(), StatusCode::NOT_FOUND);
        let body = http.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"404 Not Found!");
    }
}
