use thiserror::Error;

/// Configuration errors that abort a controller's route build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteBuildError {
    /// A placeholder names something that is not a parameter of the method.
    #[error("{token} is not a parameter of the method {controller}::{method}")]
    UnknownParameter {
        controller: String,
        method: String,
        /// The literal placeholder as written, e.g. `{~lang}`
        token: String,
    },
    /// A `{...name}` placeholder is followed by further placeholders, so the
    /// capture boundaries are ambiguous.
    #[error("variadic placeholder {token} must be the last placeholder in the path of {controller}::{method}")]
    VariadicNotLast {
        controller: String,
        method: String,
        token: String,
    },
    /// A table key could not be compiled into a regex.
    #[error("route path '{path}' is not a valid pattern: {reason}")]
    InvalidPattern { path: String, reason: String },
}
