#![forbid(unsafe_code)]

//! Dotted key paths used as binding expressions.
//!
//! A [`KeyPath`] is the only expression form a binding understands:
//! `name`, `user.name`, `items.0`. Whitespace around the whole path is
//! insignificant; whitespace inside a segment is kept verbatim.

use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// A parsed, non-empty dotted key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a binding expression into a key path.
    ///
    /// # Errors
    ///
    /// - [`PathError::Empty`] if `expr` is blank.
    /// - [`PathError::EmptySegment`] if any dotted segment is empty.
    pub fn parse(expr: &str) -> Result<Self, PathError> {
        let raw = expr.trim();
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        for segment in raw.split('.') {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    path: raw.to_string(),
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// First segment, resolved through the façade.
    #[must_use]
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    /// Segments after the head.
    #[must_use]
    pub fn rest(&self) -> &[String] {
        &self.segments[1..]
    }

    /// All segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Split into the parent segments and the last segment.
    #[must_use]
    pub fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parent)) => (parent, last.as_str()),
            None => (&self.segments[..0], ""),
        }
    }

    /// Whether the path is a single top-level name.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }

    /// The trimmed source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for KeyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_name() {
        let path = KeyPath::parse("name").unwrap();
        assert_eq!(path.head(), "name");
        assert!(path.rest().is_empty());
        assert!(path.is_simple());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let path = KeyPath::parse("  user.name \t").unwrap();
        assert_eq!(path.as_str(), "user.name");
        assert_eq!(path.segments(), ["user", "name"]);
    }

    #[test]
    fn split_last_separates_parent() {
        let path: KeyPath = "a.b.c".parse().unwrap();
        let (parent, last) = path.split_last();
        assert_eq!(parent, ["a", "b"]);
        assert_eq!(last, "c");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(KeyPath::parse("   "), Err(PathError::Empty));
    }

    #[test]
    fn rejects_empty_segment() {
        let err = KeyPath::parse("user..name").unwrap_err();
        assert_eq!(
            err,
            PathError::EmptySegment {
                path: "user..name".into()
            }
        );
        assert!(err.to_string().contains("user..name"));
    }
}
