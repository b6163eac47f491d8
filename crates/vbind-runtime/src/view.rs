#![forbid(unsafe_code)]

//! The bound view: one model, one façade, one compiled tree.
//!
//! [`BoundView::new`] runs the full setup in order:
//!
//! 1. instrument the model (it must be a map);
//! 2. mount it on a fresh [`Facade`] and flatten it;
//! 3. register the configured methods;
//! 4. resolve the mount target and compile it.
//!
//! An unresolvable (or absent) mount target is not an error: the view is
//! created with a reactive model and no bindings.

use std::rc::Rc;

use tracing::{debug, debug_span};
use vbind_core::{Facade, Method, ReactiveMap, Value, instrument};
use vbind_template::{BindingScope, Compiler, HostTree, TemplateSyntax};

use crate::error::ViewError;

/// Everything needed to create a [`BoundView`].
pub struct ViewConfig {
    data: Value,
    methods: Vec<(String, Method)>,
    mount: Option<String>,
    syntax: TemplateSyntax,
}

impl ViewConfig {
    /// Start from the initial model.
    #[must_use]
    pub fn new(data: impl Into<Value>) -> Self {
        Self {
            data: data.into(),
            methods: Vec::new(),
            mount: None,
            syntax: TemplateSyntax::default(),
        }
    }

    /// Register a method callable from event bindings.
    #[must_use]
    pub fn method(mut self, name: &str, method: impl Fn(&Facade, &Value) + 'static) -> Self {
        self.methods.push((name.to_string(), Rc::new(method)));
        self
    }

    /// Selector handed to [`HostTree::query`] to find the mount target.
    #[must_use]
    pub fn mount(mut self, selector: impl Into<String>) -> Self {
        self.mount = Some(selector.into());
        self
    }

    #[must_use]
    pub fn syntax(mut self, syntax: TemplateSyntax) -> Self {
        self.syntax = syntax;
        self
    }
}

impl std::fmt::Debug for ViewConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let methods: Vec<&str> = self.methods.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("ViewConfig")
            .field("methods", &methods)
            .field("mount", &self.mount)
            .field("syntax", &self.syntax)
            .finish()
    }
}

/// A model bound to a host tree.
pub struct BoundView<H: HostTree> {
    facade: Facade,
    data: ReactiveMap,
    root: Option<H::Node>,
    scope: BindingScope<H::Node>,
}

impl<H: HostTree + 'static> BoundView<H> {
    /// Instrument, flatten, register methods, then compile the mount target.
    ///
    /// # Errors
    ///
    /// - [`ViewError::DataNotAMap`] if the model root is not a map.
    /// - [`ViewError::Compile`] if the template references an unknown
    ///   method or holds a malformed expression.
    pub fn new(host: Rc<H>, config: ViewConfig) -> Result<Self, ViewError> {
        let _span = debug_span!("bound_view").entered();
        let ViewConfig {
            data,
            methods,
            mount,
            syntax,
        } = config;

        let Value::Map(data) = instrument(data) else {
            return Err(ViewError::DataNotAMap);
        };
        let facade = Facade::with_data(data.clone());
        facade.flatten(Facade::DATA);
        for (name, method) in methods {
            facade.insert_method(&name, method);
        }

        let root = mount.as_deref().and_then(|selector| host.query(selector));
        let scope = match &root {
            Some(node) => Compiler::new(host, &facade).with_syntax(syntax).compile(node)?,
            None => {
                debug!(mount = ?mount, "mount target unresolved, compile skipped");
                BindingScope::new()
            }
        };

        Ok(Self {
            facade,
            data,
            root,
            scope,
        })
    }
}

impl<H: HostTree> BoundView<H> {
    /// The façade: flattened model access plus methods.
    #[must_use]
    pub fn facade(&self) -> &Facade {
        &self.facade
    }

    /// The instrumented model.
    #[must_use]
    pub fn data(&self) -> &ReactiveMap {
        &self.data
    }

    /// The resolved mount target, if any.
    #[must_use]
    pub fn root(&self) -> Option<&H::Node> {
        self.root.as_ref()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    /// Bindings created by compilation.
    #[must_use]
    pub fn bindings(&self) -> &BindingScope<H::Node> {
        &self.scope
    }
}

impl<H: HostTree> std::fmt::Debug for BoundView<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundView")
            .field("facade", &self.facade)
            .field("root", &self.root)
            .field("bindings", &self.scope)
            .finish()
    }
}

/// Create a bound view. Shorthand for [`BoundView::new`].
///
/// # Errors
///
/// See [`BoundView::new`].
pub fn create_bound_view<H: HostTree + 'static>(
    host: Rc<H>,
    config: ViewConfig,
) -> Result<BoundView<H>, ViewError> {
    BoundView::new(host, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;
    use vbind_harness::MemTree;

    fn app(tree: &MemTree) {
        let input = tree.el("input", &[("v-model", "msg")], &[]);
        let text = tree.text("{{ msg }}");
        let p = tree.el("p", &[], &[text]);
        tree.el("div", &[("id", "app")], &[input, p]);
    }

    #[test]
    fn new_instruments_flattens_and_compiles() {
        let tree = Rc::new(MemTree::new());
        app(&tree);
        let view = BoundView::new(
            Rc::clone(&tree),
            ViewConfig::new(json!({ "msg": "hi" })).mount("#app"),
        )
        .unwrap();

        assert!(view.is_mounted());
        assert!(view.data().is_reactive("msg"));
        assert_eq!(view.facade().property_names(), vec!["msg"]);
        assert_eq!(view.bindings().binding_count(), 2);
        assert_eq!(tree.text_of(&tree.query("p").unwrap()), "hi");
    }

    #[test]
    fn non_map_data_is_rejected() {
        let tree = Rc::new(MemTree::new());
        let err = BoundView::new(tree, ViewConfig::new(json!([1, 2]))).unwrap_err();
        assert_eq!(err, ViewError::DataNotAMap);
    }

    #[test]
    #[traced_test]
    fn unresolved_mount_skips_compile() {
        let tree = Rc::new(MemTree::new());
        app(&tree);
        let view = create_bound_view(
            Rc::clone(&tree),
            ViewConfig::new(json!({ "msg": "hi" })).mount("#missing"),
        )
        .unwrap();

        assert!(!view.is_mounted());
        assert!(view.bindings().is_empty());
        assert!(view.data().is_reactive("msg"));
        assert!(logs_contain("compile skipped"));
        assert_eq!(tree.text_of(&tree.query("p").unwrap()), "{{ msg }}");
    }

    #[test]
    fn methods_are_registered_before_compile() {
        let tree = Rc::new(MemTree::new());
        let button = tree.el("button", &[("@click", "bump")], &[]);
        tree.el("div", &[("id", "app")], &[button]);
        let view = BoundView::new(
            Rc::clone(&tree),
            ViewConfig::new(json!({ "n": 0 }))
                .method("bump", |vm, _| {
                    let n = vm.get("n").as_f64().unwrap_or(0.0);
                    vm.set("n", n + 1.0).unwrap();
                })
                .mount("#app"),
        )
        .unwrap();

        tree.click(&button);
        tree.click(&button);
        assert_eq!(view.facade().get("n").as_f64(), Some(2.0));
    }

    #[test]
    fn missing_method_surfaces_as_view_error() {
        let tree = Rc::new(MemTree::new());
        let button = tree.el("button", &[("@click", "nope")], &[]);
        tree.el("div", &[("id", "app")], &[button]);
        let err = BoundView::new(tree, ViewConfig::new(json!({})).mount("#app")).unwrap_err();
        assert!(matches!(err, ViewError::Compile(_)));
    }

    #[test]
    fn config_debug_lists_methods() {
        let config = ViewConfig::new(json!({})).method("save", |_, _| {});
        assert!(format!("{config:?}").contains("save"));
    }
}
