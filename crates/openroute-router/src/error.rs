//! Router build errors.

use http::Method;
use thiserror::Error;

/// Errors raised while inserting routes into a [`Router`](crate::Router).
///
/// All of these are build-time conflicts. Resolution itself never fails; it
/// only reports "not found".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// Two routes bind differently named parameters at the same position.
    #[error("parameter ':{new}' in '{path}' conflicts with existing parameter ':{existing}'")]
    ParamConflict {
        /// Path being inserted.
        path: String,
        /// Name already bound at this position.
        existing: String,
        /// Name the new route tried to bind.
        new: String,
    },

    /// The same method is already registered for an equivalent path.
    #[error("route {method} {path} is already registered")]
    DuplicateRoute {
        /// Conflicting method.
        method: Method,
        /// Path being inserted.
        path: String,
    },

    /// A `:` segment without a name.
    #[error("empty parameter name in '{path}'")]
    EmptyParamName {
        /// Offending path.
        path: String,
    },

    /// The same parameter name appears twice in one pattern.
    #[error("parameter ':{name}' appears more than once in '{path}'")]
    DuplicateParam {
        /// Offending path.
        path: String,
        /// The repeated name.
        name: String,
    },
}
