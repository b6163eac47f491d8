#![forbid(unsafe_code)]

//! Records of what a compiled template is wired to.
//!
//! Every binding the compiler creates is held in a [`BindingScope`]: the
//! node, what kind of binding it is, and for value bindings the live
//! [`Watcher`]. The scope lets callers inspect the wiring; the model's
//! registries are what keep the subscribers running.
//!
//! # Invariants
//!
//! 1. One record per directive, interpolation or event attribute compiled.
//! 2. Value bindings always carry their watcher; event bindings never do.
//! 3. Records are kept in compile (document) order.
//!
//! # Failure Modes
//!
//! - Dropping the scope (or the whole view) does not unsubscribe: registries
//!   hold their watchers strongly and there is no removal path, so bindings
//!   stay live for as long as the model is reachable.

use vbind_core::{KeyPath, Watcher};

use crate::directive::Directive;

/// What a binding does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// `{{ expr }}` inside a text node.
    Interpolation,
    Directive(Directive),
    /// Event listener invoking a façade method.
    Event { event: String, method: String },
}

/// One compiled binding.
#[derive(Debug, Clone)]
pub struct Binding<N> {
    node: N,
    kind: BindingKind,
    watcher: Option<Watcher>,
}

impl<N> Binding<N> {
    pub(crate) fn value(node: N, kind: BindingKind, watcher: Watcher) -> Self {
        Self {
            node,
            kind,
            watcher: Some(watcher),
        }
    }

    pub(crate) fn event(node: N, event: &str, method: &str) -> Self {
        Self {
            node,
            kind: BindingKind::Event {
                event: event.to_string(),
                method: method.to_string(),
            },
            watcher: None,
        }
    }

    #[must_use]
    pub fn node(&self) -> &N {
        &self.node
    }

    #[must_use]
    pub fn kind(&self) -> &BindingKind {
        &self.kind
    }

    #[must_use]
    pub fn watcher(&self) -> Option<&Watcher> {
        self.watcher.as_ref()
    }

    /// The bound expression, for value bindings.
    #[must_use]
    pub fn path(&self) -> Option<&KeyPath> {
        self.watcher.as_ref().map(Watcher::path)
    }
}

/// All bindings created for one compiled tree.
pub struct BindingScope<N> {
    bindings: Vec<Binding<N>>,
}

impl<N> BindingScope<N> {
    /// Create an empty binding scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Take ownership of a binding record.
    pub fn hold(&mut self, binding: Binding<N>) {
        self.bindings.push(binding);
    }

    /// Number of bindings held.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding<N>> {
        self.bindings.iter()
    }

    /// Live subscribers, in compile order.
    pub fn watchers(&self) -> impl Iterator<Item = &Watcher> {
        self.bindings.iter().filter_map(Binding::watcher)
    }

    /// Bindings whose expression is exactly `expr`.
    pub fn bound_to<'a>(&'a self, expr: &'a str) -> impl Iterator<Item = &'a Binding<N>> {
        self.bindings
            .iter()
            .filter(move |b| b.path().is_some_and(|p| p.as_str() == expr))
    }
}

impl<N> Default for BindingScope<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> std::fmt::Debug for BindingScope<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.bindings.len())
            .field("watcher_count", &self.watchers().count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vbind_core::{Facade, Value, instrument};

    fn facade() -> Facade {
        let data = instrument(Value::map([("name", "ann"), ("title", "t")]));
        let facade = Facade::with_data(data.as_map().cloned().unwrap());
        facade.flatten(Facade::DATA);
        facade
    }

    #[test]
    fn scope_counts_and_filters_bindings() {
        let f = facade();
        let mut scope = BindingScope::new();
        let w = Watcher::watch(&f, "name", |_| {}).unwrap();
        scope.hold(Binding::value(1u32, BindingKind::Interpolation, w));
        let w = Watcher::watch(&f, "title", |_| {}).unwrap();
        scope.hold(Binding::value(
            2u32,
            BindingKind::Directive(Directive::Bind("title".into())),
            w,
        ));
        scope.hold(Binding::event(3u32, "click", "save"));

        assert_eq!(scope.binding_count(), 3);
        assert_eq!(scope.watchers().count(), 2);
        let named: Vec<_> = scope.bound_to("name").map(|b| *b.node()).collect();
        assert_eq!(named, vec![1]);
    }

    #[test]
    fn event_binding_has_no_watcher() {
        let b = Binding::event("n", "click", "save");
        assert!(b.watcher().is_none());
        assert!(b.path().is_none());
        assert_eq!(
            b.kind(),
            &BindingKind::Event {
                event: "click".into(),
                method: "save".into()
            }
        );
    }

    #[test]
    fn empty_scope_debug() {
        let scope: BindingScope<()> = BindingScope::default();
        assert!(scope.is_empty());
        let dbg = format!("{scope:?}");
        assert!(dbg.contains("binding_count: 0"));
    }
}
