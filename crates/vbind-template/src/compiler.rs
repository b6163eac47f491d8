#![forbid(unsafe_code)]

//! Depth-first template compiler.
//!
//! [`Compiler::compile`] walks the children of a root node. For each child:
//!
//! - an element has its attributes classified by [`TemplateSyntax`]; known
//!   directives are bound, event attributes attach a listener that calls a
//!   façade method, unknown directives and plain attributes are left alone;
//! - a text node containing an interpolation marker is bound as text;
//! - then its own children are compiled.
//!
//! A value binding renders once with the current value and then creates a
//! [`Watcher`] whose callback re-renders the node on every change. Because
//! the watcher collects its dependencies while evaluating the expression,
//! every slot on the path ends up holding it.
//!
//! # Failure Modes
//!
//! - An event attribute naming an unknown method aborts compilation with
//!   [`CompileError::MissingMethod`]. Bindings created before the failure
//!   stay live.
//! - A malformed key path aborts with [`CompileError::InvalidExpression`].

use std::rc::Rc;

use tracing::{debug, debug_span, trace, warn};
use vbind_core::{Facade, KeyPath, Watcher, untracked};

use crate::binding::{Binding, BindingKind, BindingScope};
use crate::directive::Directive;
use crate::error::CompileError;
use crate::host::{HostEvent, HostTree, Listener, NodeKind};
use crate::syntax::{AttrKind, TemplateSyntax};

/// Event a `v-model` binding listens to for write-back.
pub const MODEL_EVENT: &str = "input";

/// Wires one host tree to one façade.
pub struct Compiler<H: HostTree> {
    host: Rc<H>,
    facade: Facade,
    syntax: TemplateSyntax,
    scope: BindingScope<H::Node>,
}

impl<H: HostTree + 'static> Compiler<H> {
    #[must_use]
    pub fn new(host: Rc<H>, facade: &Facade) -> Self {
        Self {
            host,
            facade: facade.clone(),
            syntax: TemplateSyntax::default(),
            scope: BindingScope::new(),
        }
    }

    #[must_use]
    pub fn with_syntax(mut self, syntax: TemplateSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Compile every descendant of `root`. The root's own attributes are not
    /// compiled.
    ///
    /// # Errors
    ///
    /// See the module-level failure modes.
    pub fn compile(mut self, root: &H::Node) -> Result<BindingScope<H::Node>, CompileError> {
        let _span = debug_span!("compile").entered();
        self.compile_children(root)?;
        debug!(bindings = self.scope.binding_count(), "compiled");
        Ok(self.scope)
    }

    fn compile_children(&mut self, node: &H::Node) -> Result<(), CompileError> {
        for child in self.host.child_nodes(node) {
            match self.host.node_kind(&child) {
                NodeKind::Element => self.compile_element(&child)?,
                NodeKind::Text => self.compile_text(&child)?,
                NodeKind::Other => {}
            }
            self.compile_children(&child)?;
        }
        Ok(())
    }

    fn compile_element(&mut self, node: &H::Node) -> Result<(), CompileError> {
        for attr in self.host.attributes(node) {
            match self.syntax.classify(&attr.name) {
                AttrKind::Directive { name, arg } => {
                    let Some(directive) = Directive::from_parts(name, arg) else {
                        debug!(attr = %attr.name, "unknown directive ignored");
                        continue;
                    };
                    let path = parse(&attr.value, &attr.name)?;
                    if directive == Directive::Model {
                        self.listen_for_input(node, path.clone());
                    }
                    let kind = BindingKind::Directive(directive.clone());
                    self.bind_value(node, path, directive, kind);
                }
                AttrKind::Event(event) => self.bind_event(node, event, attr.value.trim())?,
                AttrKind::Plain => {}
            }
        }
        Ok(())
    }

    fn compile_text(&mut self, node: &H::Node) -> Result<(), CompileError> {
        let text = self.host.text_content(node);
        let Some(expr) = self.syntax.interpolation(&text) else {
            return Ok(());
        };
        let path = parse(expr, text.trim())?;
        self.bind_value(node, path, Directive::Text, BindingKind::Interpolation);
        Ok(())
    }

    /// Initial render plus a watcher that re-renders on change.
    fn bind_value(
        &mut self,
        node: &H::Node,
        path: KeyPath,
        directive: Directive,
        kind: BindingKind,
    ) {
        let initial = untracked(|| self.facade.evaluate(&path));
        directive.render(&*self.host, node, &initial);

        let host = Rc::clone(&self.host);
        let target = node.clone();
        let watcher = Watcher::new(&self.facade, path, move |value| {
            directive.render(&*host, &target, value);
        });
        trace!(watcher = watcher.id().get(), expr = %watcher.path(), "bound");
        self.scope.hold(Binding::value(node.clone(), kind, watcher));
    }

    /// `v-model` write-back: every input event assigns the target value.
    fn listen_for_input(&self, node: &H::Node, path: KeyPath) {
        let link = self.facade.link();
        let listener: Listener = Rc::new(move |event: &HostEvent| {
            let Some(value) = event.target_value.as_deref() else {
                return;
            };
            if let Err(err) = link.facade().assign(&path, value) {
                warn!(%err, "model write-back failed");
            }
        });
        self.host.add_event_listener(node, MODEL_EVENT, listener);
    }

    fn bind_event(
        &mut self,
        node: &H::Node,
        event: &str,
        method_name: &str,
    ) -> Result<(), CompileError> {
        let method = self
            .facade
            .method(method_name)
            .ok_or_else(|| CompileError::MissingMethod {
                event: event.to_string(),
                method: method_name.to_string(),
            })?;
        let link = self.facade.link();
        let listener: Listener = Rc::new(move |host_event: &HostEvent| {
            method(&link.facade(), &host_event.to_value());
        });
        self.host.add_event_listener(node, event, listener);
        debug!(event, method = method_name, "event bound");
        self.scope.hold(Binding::event(node.clone(), event, method_name));
        Ok(())
    }
}

/// Compile `root` against `facade` with the default syntax.
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn compile<H: HostTree + 'static>(
    host: Rc<H>,
    root: &H::Node,
    facade: &Facade,
) -> Result<BindingScope<H::Node>, CompileError> {
    Compiler::new(host, facade).compile(root)
}

fn parse(expr: &str, origin: &str) -> Result<KeyPath, CompileError> {
    KeyPath::parse(expr).map_err(|source| CompileError::InvalidExpression {
        origin: origin.to_string(),
        source,
    })
}
