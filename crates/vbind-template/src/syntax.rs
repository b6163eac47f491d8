#![forbid(unsafe_code)]

//! Marker syntax: directive/event attribute prefixes and interpolation
//! delimiters.

/// How the compiler recognizes bindings in a template.
///
/// Defaults: directives start with `v-`, event shorthands with `@`, and
/// interpolations are delimited by `{{` and `}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TemplateSyntax {
    pub directive_prefix: String,
    pub event_prefix: String,
    pub open_delimiter: String,
    pub close_delimiter: String,
}

impl Default for TemplateSyntax {
    fn default() -> Self {
        Self {
            directive_prefix: "v-".into(),
            event_prefix: "@".into(),
            open_delimiter: "{{".into(),
            close_delimiter: "}}".into(),
        }
    }
}

/// What an attribute name means to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind<'a> {
    /// `v-name` or `v-name:arg`.
    Directive { name: &'a str, arg: Option<&'a str> },
    /// `@event` or `v-on:event`.
    Event(&'a str),
    /// Anything else.
    Plain,
}

impl TemplateSyntax {
    /// Classify an attribute name.
    #[must_use]
    pub fn classify<'a>(&self, attr: &'a str) -> AttrKind<'a> {
        if let Some(rest) = prefixed(attr, &self.directive_prefix) {
            let (name, arg) = match rest.split_once(':') {
                Some((name, arg)) => (name, Some(arg)),
                None => (rest, None),
            };
            return match (name, arg) {
                ("on", Some(event)) if !event.is_empty() => AttrKind::Event(event),
                _ => AttrKind::Directive { name, arg },
            };
        }
        match prefixed(attr, &self.event_prefix) {
            Some(event) => AttrKind::Event(event),
            None => AttrKind::Plain,
        }
    }

    /// The trimmed expression of the first interpolation marker in `text`,
    /// or `None` when the text holds no non-empty marker.
    ///
    /// The first close delimiter after the open delimiter ends the marker.
    #[must_use]
    pub fn interpolation<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.open_delimiter.is_empty() || self.close_delimiter.is_empty() {
            return None;
        }
        let start = text.find(&self.open_delimiter)? + self.open_delimiter.len();
        let len = text[start..].find(&self.close_delimiter)?;
        let expr = text[start..start + len].trim();
        (!expr.is_empty()).then_some(expr)
    }
}

fn prefixed<'a>(attr: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    attr.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn classifies_directives() {
        let s = TemplateSyntax::default();
        assert_eq!(
            s.classify("v-model"),
            AttrKind::Directive { name: "model", arg: None }
        );
        assert_eq!(
            s.classify("v-bind:title"),
            AttrKind::Directive { name: "bind", arg: Some("title") }
        );
    }

    #[test]
    fn classifies_events() {
        let s = TemplateSyntax::default();
        assert_eq!(s.classify("@click"), AttrKind::Event("click"));
        assert_eq!(s.classify("v-on:input"), AttrKind::Event("input"));
    }

    #[test]
    fn bare_prefixes_are_plain() {
        let s = TemplateSyntax::default();
        assert_eq!(s.classify("@"), AttrKind::Plain);
        assert_eq!(s.classify("v-"), AttrKind::Plain);
        assert_eq!(s.classify("class"), AttrKind::Plain);
    }

    #[test]
    fn interpolation_extracts_trimmed_expression() {
        let s = TemplateSyntax::default();
        assert_eq!(s.interpolation("{{ name }}"), Some("name"));
        assert_eq!(s.interpolation("Hello {{user.name}}!"), Some("user.name"));
        assert_eq!(s.interpolation("{{ a }} and {{ b }}"), Some("a"));
    }

    #[test]
    fn interpolation_rejects_empty_and_unterminated() {
        let s = TemplateSyntax::default();
        assert_eq!(s.interpolation("{{   }}"), None);
        assert_eq!(s.interpolation("{{ name"), None);
        assert_eq!(s.interpolation("plain text"), None);
    }

    #[test]
    fn custom_delimiters() {
        let s = TemplateSyntax {
            open_delimiter: "[[".into(),
            close_delimiter: "]]".into(),
            ..TemplateSyntax::default()
        };
        assert_eq!(s.interpolation("[[ x ]]"), Some("x"));
        assert_eq!(s.interpolation("{{ x }}"), None);
    }

    proptest! {
        #[test]
        fn text_without_open_delimiter_never_interpolates(text in "[^{]*") {
            prop_assert_eq!(TemplateSyntax::default().interpolation(&text), None);
        }

        #[test]
        fn wrapped_identifier_round_trips(ident in "[a-z][a-z0-9_]{0,8}", pad in " {0,3}") {
            let text = format!("{{{{{pad}{ident}{pad}}}}}");
            prop_assert_eq!(TemplateSyntax::default().interpolation(&text), Some(ident.as_str()));
        }
    }
}
