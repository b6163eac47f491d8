#![forbid(unsafe_code)]

//! Errors surfaced by key-path parsing and façade writes.

/// Errors from key-path parsing and façade write-back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The expression was empty (or whitespace only).
    Empty,
    /// A dotted path contained an empty segment, e.g. `user..name`.
    EmptySegment { path: String },
    /// The path does not lead to a writable container slot.
    Unresolved { path: String },
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty binding expression"),
            Self::EmptySegment { path } => write!(f, "empty segment in key path '{path}'"),
            Self::Unresolved { path } => write!(f, "key path '{path}' does not resolve to a slot"),
        }
    }
}

impl std::error::Error for PathError {}
