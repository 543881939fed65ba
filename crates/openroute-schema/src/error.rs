//! Schema compile and validation errors.

use thiserror::Error;

/// A structurally invalid schema, reported when it is compiled.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A `pattern` that is not a valid regular expression.
    #[error("invalid pattern at '{path}': {source}")]
    InvalidPattern {
        /// Location of the offending node.
        path: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A lower bound greater than its upper bound.
    #[error("invalid {constraint} bounds at '{path}': minimum {min} exceeds maximum {max}")]
    InvalidBounds {
        /// Location of the offending node.
        path: String,
        /// Which pair of bounds is inconsistent.
        constraint: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A `required` entry with no matching property.
    #[error("required property '{key}' at '{path}' is not declared in properties")]
    UndeclaredRequired {
        /// Location of the object node.
        path: String,
        /// The required key.
        key: String,
    },

    /// An array schema without an item schema.
    #[error("array schema at '{path}' has no items schema")]
    MissingItems {
        /// Location of the array node.
        path: String,
    },
}

impl SchemaError {
    /// Creates a bounds error.
    pub(crate) fn bounds(path: &str, constraint: &'static str, min: f64, max: f64) -> Self {
        Self::InvalidBounds {
            path: display_path(path),
            constraint,
            min,
            max,
        }
    }
}

/// The first constraint a value violated.
///
/// `message` is client-facing. It is either the schema node's custom error
/// message or a generated one prefixed with the field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The JSON path where the error occurred (empty for the root).
    pub path: String,
    /// The error message.
    pub message: String,
}

impl ValidationError {
    /// Creates an error with a generated message for `path`.
    pub(crate) fn at(path: &str, detail: impl AsRef<str>) -> Self {
        let detail = detail.as_ref();
        let message = if path.is_empty() {
            detail.to_string()
        } else {
            format!("{path}: {detail}")
        };
        Self {
            path: path.to_string(),
            message,
        }
    }

    /// Creates an error carrying a custom message verbatim.
    pub(crate) fn custom(path: &str, message: &str) -> Self {
        Self {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_prefixes_path() {
        let err = ValidationError::at("title", "expected string, got number");
        assert_eq!(err.to_string(), "title: expected string, got number");
        assert_eq!(err.path, "title");
    }

    #[test]
    fn test_validation_error_root_has_no_prefix() {
        let err = ValidationError::at("", "expected array, got object");
        assert_eq!(err.to_string(), "expected array, got object");
    }

    #[test]
    fn test_custom_message_is_verbatim() {
        let err = ValidationError::custom("title", "Invalid title provided.");
        assert_eq!(err.to_string(), "Invalid title provided.");
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::bounds("", "length", 10.0, 2.0);
        assert_eq!(
            err.to_string(),
            "invalid length bounds at '<root>': minimum 10 exceeds maximum 2"
        );
    }
}
