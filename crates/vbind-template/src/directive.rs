#![forbid(unsafe_code)]

//! Directive renderers.
//!
//! A renderer turns the current value of a binding expression into a host
//! write. The same renderer runs once at compile time and again from the
//! subscriber callback on every change.

use tracing::trace;
use vbind_core::Value;

use crate::host::HostTree;

/// A recognized directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `v-model`: writes the node's `value` property; input writes back.
    Model,
    /// `v-text`, also used for `{{ }}` interpolation.
    Text,
    /// `v-html`: replaces the node's inner markup.
    Html,
    /// `v-bind:<attr>`: writes one attribute.
    Bind(String),
}

impl Directive {
    /// Map a classified directive name and argument to a renderer.
    /// Unknown names yield `None`.
    #[must_use]
    pub fn from_parts(name: &str, arg: Option<&str>) -> Option<Self> {
        match (name, arg) {
            ("model", None) => Some(Self::Model),
            ("text", None) => Some(Self::Text),
            ("html", None) => Some(Self::Html),
            ("bind", Some(attr)) if !attr.is_empty() => Some(Self::Bind(attr.to_string())),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Model => "model",
            Self::Text => "text",
            Self::Html => "html",
            Self::Bind(_) => "bind",
        }
    }

    /// Write `value` into `node`.
    pub fn render<H: HostTree + ?Sized>(&self, host: &H, node: &H::Node, value: &Value) {
        let rendered = value.render();
        trace!(directive = self.name(), value = %rendered, "render");
        match self {
            Self::Model => host.set_property(node, "value", &rendered),
            Self::Text => host.set_text_content(node, &rendered),
            Self::Html => host.set_inner_markup(node, &rendered),
            Self::Bind(attr) => host.set_attribute(node, attr, &rendered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_directives_resolve() {
        assert_eq!(Directive::from_parts("model", None), Some(Directive::Model));
        assert_eq!(Directive::from_parts("text", None), Some(Directive::Text));
        assert_eq!(Directive::from_parts("html", None), Some(Directive::Html));
        assert_eq!(
            Directive::from_parts("bind", Some("title")),
            Some(Directive::Bind("title".into()))
        );
    }

    #[test]
    fn unknown_or_malformed_directives_are_none() {
        assert_eq!(Directive::from_parts("show", None), None);
        assert_eq!(Directive::from_parts("bind", None), None);
        assert_eq!(Directive::from_parts("text", Some("x")), None);
    }
}
