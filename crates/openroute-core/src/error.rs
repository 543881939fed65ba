//! Error types for OpenRoute.
//!
//! Two families exist:
//!
//! - [`BuildError`]: a misconfigured route. Raised synchronously while a
//!   route is being defined or indexed, never while serving.
//! - [`RouteError`]: anything that goes wrong while a request runs through a
//!   route. The pipeline converts it into an `{"error": "<message>"}`
//!   response; it never reaches the transport as an unhandled fault.
//!
//! # Status mapping
//!
//! | `ErrorCategory` | Status |
//! |---|---|
//! | `Validation` | 400 |
//! | `Authentication` | 401 |
//! | `Authorization` | 403 |
//! | `NotFound` | 404 |
//! | `Conflict` | 409 |
//! | `Internal` | 500 |

use http::StatusCode;
use openroute_router::RouterError;
use openroute_schema::{SchemaError, Surface, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`RouteError`].
pub type RouteResult<T> = Result<T, RouteError>;

/// Categories of request-time errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Request input did not match a declared schema.
    Validation,
    /// Missing or invalid credentials.
    Authentication,
    /// Permission denied.
    Authorization,
    /// Resource not found.
    NotFound,
    /// Conflicting state.
    Conflict,
    /// Server-side failure, including responses that break their schema.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Authorization => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors raised while a request runs through a route.
///
/// Middlewares and handlers return this (or anything convertible into it)
/// to abort a request.
///
/// # Example
///
/// ```
/// use openroute_core::RouteError;
///
/// fn find_article(id: &str) -> Result<String, RouteError> {
///     if id.is_empty() {
///         return Err(RouteError::not_found("Article not found."));
///     }
///     Ok(id.to_string())
/// }
///
/// let err = find_article("").unwrap_err();
/// assert_eq!(err.status_code(), http::StatusCode::NOT_FOUND);
/// assert_eq!(err.client_message(), "Article not found.");
/// ```
#[derive(Error, Debug)]
pub enum RouteError {
    /// Request input failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Client-facing message.
        message: String,
        /// Path of the offending field, if known.
        field: Option<String>,
    },

    /// Authentication failed.
    #[error("Authentication error: {message}")]
    Authentication {
        /// Client-facing message.
        message: String,
    },

    /// Authorization denied.
    #[error("Authorization denied: {message}")]
    Authorization {
        /// Client-facing message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Client-facing message.
        message: String,
    },

    /// Conflicting state.
    #[error("Conflict: {message}")]
    Conflict {
        /// Client-facing message.
        message: String,
    },

    /// The handler's result does not match the declared response schema.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Client-facing message.
        message: String,
    },

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        /// Client-facing message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl RouteError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates an authorization error.
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Wraps a response schema violation.
    #[must_use]
    pub fn invalid_response(err: ValidationError) -> Self {
        Self::InvalidResponse {
            message: err.message,
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Authentication { .. } => ErrorCategory::Authentication,
            Self::Authorization { .. } => ErrorCategory::Authorization,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::InvalidResponse { .. } | Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// The message written into the `{"error": ...}` response body.
    ///
    /// Never includes the internal source chain.
    #[must_use]
    pub fn client_message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Authentication { message }
            | Self::Authorization { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::InvalidResponse { message }
            | Self::Internal { message, .. } => message,
        }
    }

    /// Serializes the wire error body.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.client_message() })
    }
}

impl From<ValidationError> for RouteError {
    fn from(err: ValidationError) -> Self {
        Self::Validation {
            message: err.message,
            field: Some(err.path).filter(|p| !p.is_empty()),
        }
    }
}

impl From<anyhow::Error> for RouteError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal_with_source("Internal server error", err)
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal_with_source("Internal server error", err)
    }
}

/// Errors raised while defining or indexing routes.
#[derive(Error, Debug)]
pub enum BuildError {
    /// `set_path` was never called or got an empty method.
    #[error("method and path must be specified for the route")]
    MissingMethodOrPath,

    /// The method is not one of GET, POST, PUT, PATCH, DELETE, OPTIONS.
    #[error("unsupported method '{0}'")]
    UnsupportedMethod(String),

    /// `set_handle` was never called.
    #[error("a request handler must be specified for the route")]
    MissingHandler,

    /// A request body schema on a method that carries no body.
    #[error("request data schema is not allowed on {method} routes")]
    RequestDataNotAllowed {
        /// The offending method.
        method: String,
    },

    /// A `:name` path segment with no matching required params key.
    #[error("path parameter '{name}' in '{path}' has no required key in the params schema")]
    MissingPathParam {
        /// The parameter name.
        name: String,
        /// The route path.
        path: String,
    },

    /// A `:` segment without a name.
    #[error("empty path parameter name in '{0}'")]
    InvalidPath(String),

    /// The same `:name` appears twice in the path.
    #[error("path parameter '{name}' appears more than once in '{path}'")]
    DuplicatePathParam {
        /// The repeated name.
        name: String,
        /// The route path.
        path: String,
    },

    /// A schema failed to compile.
    #[error("invalid {surface:?} schema: {source}")]
    InvalidSchema {
        /// The surface the schema was set for.
        surface: Surface,
        /// The compile error.
        #[source]
        source: SchemaError,
    },

    /// The success status code is out of range.
    #[error("invalid response code {0}")]
    InvalidStatus(u16),

    /// Indexing the route failed.
    #[error(transparent)]
    Router(#[from] RouterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_status_mapping() {
        assert_eq!(RouteError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RouteError::authentication("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(RouteError::authorization("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(RouteError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(RouteError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            RouteError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_message_hides_source() {
        let err = RouteError::internal_with_source(
            "Could not load articles.",
            anyhow::anyhow!("connection refused: db-7:5432"),
        );

        assert_eq!(err.client_message(), "Could not load articles.");
        assert_eq!(
            err.to_body(),
            serde_json::json!({ "error": "Could not load articles." })
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_validation_error() {
        let schema = openroute_schema::Schema::object()
            .property("title", openroute_schema::Schema::string());
        let validator = openroute_schema::Validator::compile(schema).unwrap();
        let err: RouteError = validator
            .check(&serde_json::json!({}))
            .unwrap_err()
            .into();

        match &err {
            RouteError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("title")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.client_message(), "title: required property is missing");
    }

    #[test]
    fn test_invalid_response_is_internal() {
        let err = RouteError::InvalidResponse {
            message: "expected array, got object".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_build_error_messages() {
        assert_eq!(
            BuildError::RequestDataNotAllowed {
                method: "GET".to_string()
            }
            .to_string(),
            "request data schema is not allowed on GET routes"
        );
        assert_eq!(
            BuildError::MissingPathParam {
                name: "id".to_string(),
                path: "/articles/:id".to_string(),
            }
            .to_string(),
            "path parameter 'id' in '/articles/:id' has no required key in the params schema"
        );
    }
}
