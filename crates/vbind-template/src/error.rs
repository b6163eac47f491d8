#![forbid(unsafe_code)]

//! Compile-time failures.

use vbind_core::PathError;

/// Why a template could not be wired to its façade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// An event binding names a method the façade does not define.
    MissingMethod { event: String, method: String },
    /// A binding expression is not a well-formed key path.
    InvalidExpression { origin: String, source: PathError },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMethod { event, method } => {
                write!(f, "'{event}' handler refers to unknown method '{method}'")
            }
            Self::InvalidExpression { origin, source } => {
                write!(f, "invalid binding expression in {origin}: {source}")
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidExpression { source, .. } => Some(source),
            Self::MissingMethod { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn missing_method_names_event_and_method() {
        let err = CompileError::MissingMethod {
            event: "click".into(),
            method: "save".into(),
        };
        assert_eq!(err.to_string(), "'click' handler refers to unknown method 'save'");
        assert!(err.source().is_none());
    }

    #[test]
    fn invalid_expression_chains_path_error() {
        let err = CompileError::InvalidExpression {
            origin: "v-text".into(),
            source: PathError::Empty,
        };
        assert!(err.to_string().starts_with("invalid binding expression in v-text"));
        assert!(err.source().is_some());
    }
}
