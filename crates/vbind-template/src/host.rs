#![forbid(unsafe_code)]

//! The host tree collaborator.
//!
//! The compiler never builds or parses markup. It walks an existing tree
//! through [`HostTree`], reads attributes, writes text, properties, attributes
//! and inner markup, and attaches event listeners. Implementations use
//! interior mutability: every method takes `&self`, because bound callbacks
//! hold the tree through an `Rc` and write to it long after compilation.

use std::rc::Rc;

use vbind_core::Value;

/// Coarse node classification. Only elements and text nodes are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
    /// Comments, raw markup and anything else the compiler skips.
    Other,
}

/// One attribute as read off an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An event delivered by the host to a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    /// Event name, e.g. `input` or `click`.
    pub name: String,
    /// Current `value` of the event target, when the target has one.
    pub target_value: Option<String>,
}

impl HostEvent {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_value: None,
        }
    }

    #[must_use]
    pub fn with_target_value(mut self, value: impl Into<String>) -> Self {
        self.target_value = Some(value.into());
        self
    }

    /// The payload handed to façade methods: `{ "type": name, "value": target_value }`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::map([
            ("type", Value::from(self.name.as_str())),
            ("value", Value::from(self.target_value.clone())),
        ])
    }
}

/// Listener attached to a host node.
pub type Listener = Rc<dyn Fn(&HostEvent)>;

/// Read/write access to a host document tree.
pub trait HostTree {
    /// Node handle. Cheap to clone; clones refer to the same node.
    type Node: Clone + std::fmt::Debug + 'static;

    /// Resolve a mount target. `None` when nothing matches.
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// Children in document order, as of the call.
    fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn node_kind(&self, node: &Self::Node) -> NodeKind;

    /// Attributes in document order. Empty for non-elements.
    fn attributes(&self, node: &Self::Node) -> Vec<Attribute>;

    fn text_content(&self, node: &Self::Node) -> String;

    /// Replace the text of a text node, or all children of an element with
    /// a single text node.
    fn set_text_content(&self, node: &Self::Node, text: &str);

    /// Set a live property such as an input's `value`.
    fn set_property(&self, node: &Self::Node, name: &str, value: &str);

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    /// Replace the children of an element with raw markup.
    fn set_inner_markup(&self, node: &Self::Node, markup: &str);

    fn add_event_listener(&self, node: &Self::Node, event: &str, listener: Listener);
}
