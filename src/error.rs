// Error handling for request construction and template resolution

use std::fmt;

/// Errors raised while building a request or resolving a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// A required field is missing, or a value cannot be represented where it is placed
    InvalidArgument(String),
    /// A pattern string is syntactically invalid
    MalformedPattern {
        pattern: String,
        position: usize,
        reason: String,
    },
    /// A placeholder has no value in the argument map
    UnresolvedPlaceholder { name: String },
    /// The template's method was never set
    UnsupportedMethod { operation: Option<String> },
}

impl RequestError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RequestError::InvalidArgument(reason.into())
    }

    pub(crate) fn malformed(pattern: &str, position: usize, reason: impl Into<String>) -> Self {
        RequestError::MalformedPattern {
            pattern: pattern.to_string(),
            position,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            RequestError::MalformedPattern {
                pattern,
                position,
                reason,
            } => write!(
                f,
                "Malformed pattern '{}' at position {}: {}",
                pattern, position, reason
            ),
            RequestError::UnresolvedPlaceholder { name } => {
                write!(f, "Unresolved placeholder: {}", name)
            }
            RequestError::UnsupportedMethod { operation: Some(op) } => {
                write!(f, "No HTTP method set for operation '{}'", op)
            }
            RequestError::UnsupportedMethod { operation: None } => {
                write!(f, "No HTTP method set on template")
            }
        }
    }
}

impl std::error::Error for RequestError {}
