#![forbid(unsafe_code)]

//! Errors surfaced while creating a bound view.

use vbind_template::CompileError;

/// Why a bound view could not be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The model root must be a keyed container.
    DataNotAMap,
    /// The template could not be wired to the façade.
    Compile(CompileError),
    /// Syntax configuration could not be read or parsed.
    Config(String),
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataNotAMap => write!(f, "view data must be a map"),
            Self::Compile(e) => write!(f, "template compile error: {e}"),
            Self::Config(msg) => write!(f, "syntax config error: {msg}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Compile(e) => Some(e),
            Self::DataNotAMap | Self::Config(_) => None,
        }
    }
}

impl From<CompileError> for ViewError {
    fn from(err: CompileError) -> Self {
        Self::Compile(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn compile_error_converts_and_chains() {
        let err: ViewError = CompileError::MissingMethod {
            event: "click".into(),
            method: "go".into(),
        }
        .into();
        assert!(err.to_string().contains("unknown method 'go'"));
        assert!(err.source().is_some());
    }

    #[test]
    fn data_not_a_map_display() {
        assert_eq!(ViewError::DataNotAMap.to_string(), "view data must be a map");
        assert!(ViewError::DataNotAMap.source().is_none());
    }
}
