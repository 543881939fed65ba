//! Per-request execution pipeline.
//!
//! ## Stages
//!
//! Every request runs through a fixed sequence:
//!
//! 1. **Headers** - check request headers
//! 2. **Params** - check path parameters, replace them with the cleaned form
//! 3. **Request data** - merge query and body (body wins), check, attach the
//!    cleaned result as [`Request::data`]
//! 4. **Middlewares** - in order; stop quietly if one finishes the response
//! 5. **Handler** - produce the result
//! 6. **Response data** - check the result and strip it to the schema
//! 7. **Respond** - write the JSON result with the route's success status
//!
//! Any failure jumps to the error state, which writes `{"error": "..."}`.
//! Panics in middlewares or the handler are caught and reported as internal
//! errors. The response is finished exactly once on every path.

use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use http::header::{HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use tracing::Instrument;

use crate::error::{ErrorCategory, RouteError};
use crate::request::Request;
use crate::response::ResponseSink;
use crate::route::{RouteDescriptor, RouteInner};

/// Pipeline stage, used for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Header validation.
    Headers,
    /// Path parameter validation.
    Params,
    /// Query and body validation.
    RequestData,
    /// Middleware chain.
    Middlewares,
    /// Terminal handler.
    Handler,
    /// Response validation and cleaning.
    ResponseData,
}

impl Stage {
    /// Stage name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Headers => "headers",
            Self::Params => "params",
            Self::RequestData => "request_data",
            Self::Middlewares => "middlewares",
            Self::Handler => "handler",
            Self::ResponseData => "response_data",
        }
    }
}

enum Outcome {
    /// A middleware finished the response.
    Finished,
    /// The cleaned handler result to write.
    Respond(Value),
}

struct Failure {
    stage: Stage,
    error: RouteError,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, Failure>;
}

impl<T, E: Into<RouteError>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, Failure> {
        self.map_err(|e| Failure {
            stage,
            error: e.into(),
        })
    }
}

impl RouteDescriptor {
    /// Runs `request` through this route and writes exactly one response.
    ///
    /// Expects path parameters to be bound already (see
    /// [`Request::set_params`]).
    pub async fn execute(&self, request: Request, response: &mut dyn ResponseSink) {
        let span = tracing::debug_span!(
            "route",
            method = %self.inner.method,
            path = %self.inner.path,
        );
        run(&self.inner, request, response).instrument(span).await;
    }
}

async fn run(route: &RouteInner, request: Request, response: &mut dyn ResponseSink) {
    let outcome = AssertUnwindSafe(advance(route, request, &mut *response))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(Outcome::Finished)) => {
            tracing::debug!("response finished by middleware");
        }
        Ok(Ok(Outcome::Respond(value))) => respond(route, &value, response),
        Ok(Err(Failure { stage, error })) => {
            if error.category() == ErrorCategory::Internal {
                tracing::error!(stage = stage.as_str(), error = %error, "request failed");
            } else {
                tracing::warn!(stage = stage.as_str(), error = %error, "request rejected");
            }
            fail(&error, response);
        }
        Err(_) => {
            tracing::error!("route panicked while handling request");
            fail(&RouteError::internal("Internal server error"), response);
        }
    }
}

async fn advance(
    route: &RouteInner,
    mut request: Request,
    response: &mut dyn ResponseSink,
) -> Result<Outcome, Failure> {
    let headers = Value::Object(request.headers().clone());
    route.headers.check(&headers).at(Stage::Headers)?;

    let params = Value::Object(std::mem::take(&mut request.params));
    route.params.check(&params).at(Stage::Params)?;
    if let Value::Object(cleaned) = route.params.clean(&params) {
        request.params = cleaned;
    }

    let merged = Value::Object(request.merged_input());
    route.request_data.check(&merged).at(Stage::RequestData)?;
    request.data = route.request_data.clean(&merged);

    for middleware in &route.middlewares {
        if response.is_finished() {
            return Ok(Outcome::Finished);
        }
        tracing::debug!(middleware = middleware.name(), "running middleware");
        middleware
            .call(&mut request, &mut *response)
            .await
            .at(Stage::Middlewares)?;
    }
    if response.is_finished() {
        return Ok(Outcome::Finished);
    }

    let result = route.handler.call(request).await.at(Stage::Handler)?;

    route
        .response_data
        .check(&result)
        .map_err(RouteError::invalid_response)
        .at(Stage::ResponseData)?;
    Ok(Outcome::Respond(route.response_data.clean(&result)))
}

fn respond(route: &RouteInner, value: &Value, response: &mut dyn ResponseSink) {
    if response.is_finished() {
        tracing::warn!("response already finished, dropping handler result");
        return;
    }
    response.set_status(route.status);
    response.set_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response.write(value.to_string().as_bytes());
    response.end();
    tracing::debug!(status = route.status.as_u16(), "response written");
}

fn fail(error: &RouteError, response: &mut dyn ResponseSink) {
    if response.is_finished() {
        tracing::debug!(error = %error, "response already finished, error not written");
        return;
    }
    response.clear_body();
    response.send_json(error.status_code(), &error.to_body());
}
