#![forbid(unsafe_code)]

//! Template syntax loaded from TOML.
//!
//! ```toml
//! directive_prefix = "x-"
//! open_delimiter = "[["
//! close_delimiter = "]]"
//! ```
//!
//! Missing fields fall back to [`TemplateSyntax::default`]; unknown fields
//! are rejected.

use std::path::Path;

use tracing::debug;
use vbind_template::TemplateSyntax;

use crate::error::ViewError;

/// Parse syntax from TOML source.
///
/// # Errors
///
/// [`ViewError::Config`] on malformed TOML or unknown fields.
pub fn parse_syntax(source: &str) -> Result<TemplateSyntax, ViewError> {
    toml::from_str(source).map_err(|e| ViewError::Config(e.to_string()))
}

/// Read and parse a syntax file.
///
/// # Errors
///
/// [`ViewError::Config`] if the file cannot be read or parsed.
pub fn load_syntax(path: impl AsRef<Path>) -> Result<TemplateSyntax, ViewError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ViewError::Config(format!("failed to read {}: {e}", path.display())))?;
    let syntax = parse_syntax(&content)
        .map_err(|e| ViewError::Config(format!("failed to parse {}: {e}", path.display())))?;
    debug!(path = %path.display(), "syntax loaded");
    Ok(syntax)
}
