#![forbid(unsafe_code)]

//! In-memory host tree.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Detached nodes
//! are roots; [`MemTree::query`] searches roots in creation order,
//! depth-first.
//!
//! Selectors: `#id` matches the `id` attribute, anything else matches the
//! tag name.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use tracing::trace;
use vbind_template::{Attribute, HostEvent, HostTree, Listener, NodeKind};

/// Handle to a node in a [`MemTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
enum Content {
    Element {
        tag: String,
        attrs: Vec<Attribute>,
        props: Vec<(String, String)>,
        markup: Option<String>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    content: Content,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct ListenerEntry {
    node: NodeId,
    event: String,
    listener: Listener,
}

/// Arena-backed [`HostTree`] for tests.
#[derive(Default)]
pub struct MemTree {
    nodes: RefCell<Vec<NodeData>>,
    listeners: RefCell<Vec<ListenerEntry>>,
}

impl MemTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, content: Content) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            content,
            parent: None,
            children: Vec::new(),
        });
        NodeId(nodes.len() - 1)
    }

    /// Create an element with attributes, adopting `children` in order.
    pub fn el(&self, tag: &str, attrs: &[(&str, &str)], children: &[NodeId]) -> NodeId {
        let id = self.push(Content::Element {
            tag: tag.to_string(),
            attrs: attrs.iter().map(|(n, v)| Attribute::new(*n, *v)).collect(),
            props: Vec::new(),
            markup: None,
        });
        for child in children {
            self.append(id, *child);
        }
        id
    }

    /// Create a detached text node.
    pub fn text(&self, content: &str) -> NodeId {
        self.push(Content::Text(content.to_string()))
    }

    /// Create a detached comment node.
    pub fn comment(&self, content: &str) -> NodeId {
        self.push(Content::Comment(content.to_string()))
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(old) = nodes[child.0].parent.take() {
            nodes[old.0].children.retain(|c| *c != child);
        }
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    fn detach_children(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        let children = std::mem::take(&mut nodes[node.0].children);
        for child in children {
            nodes[child.0].parent = None;
        }
    }

    #[must_use]
    pub fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    #[must_use]
    pub fn tag(&self, node: &NodeId) -> Option<String> {
        match &self.nodes.borrow()[node.0].content {
            Content::Element { tag, .. } => Some(tag.clone()),
            Content::Text(_) | Content::Comment(_) => None,
        }
    }

    /// Concatenated text of a node and its descendants. An element whose
    /// children were replaced by raw markup yields that markup.
    #[must_use]
    pub fn text_of(&self, node: &NodeId) -> String {
        let mut out = String::new();
        self.collect_text(*node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let (children, own) = {
            let nodes = self.nodes.borrow();
            let data = &nodes[node.0];
            let own = match &data.content {
                Content::Text(t) => Some(t.clone()),
                Content::Element { markup, .. } => markup.clone(),
                Content::Comment(_) => None,
            };
            (data.children.clone(), own)
        };
        if let Some(own) = own {
            out.push_str(&own);
        }
        for child in children {
            self.collect_text(child, out);
        }
    }

    #[must_use]
    pub fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        match &self.nodes.borrow()[node.0].content {
            Content::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone()),
            Content::Text(_) | Content::Comment(_) => None,
        }
    }

    #[must_use]
    pub fn property(&self, node: &NodeId, name: &str) -> Option<String> {
        match &self.nodes.borrow()[node.0].content {
            Content::Element { props, .. } => props
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone()),
            Content::Text(_) | Content::Comment(_) => None,
        }
    }

    #[must_use]
    pub fn inner_markup(&self, node: &NodeId) -> Option<String> {
        match &self.nodes.borrow()[node.0].content {
            Content::Element { markup, .. } => markup.clone(),
            Content::Text(_) | Content::Comment(_) => None,
        }
    }

    #[must_use]
    pub fn listener_count(&self, node: &NodeId, event: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|e| e.node == *node && e.event == event)
            .count()
    }

    /// Deliver `event` to every listener on `node` for its name, in attach
    /// order. Returns how many listeners ran.
    pub fn dispatch(&self, node: &NodeId, event: &HostEvent) -> usize {
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|e| e.node == *node && e.event == event.name)
            .map(|e| Rc::clone(&e.listener))
            .collect();
        trace!(node = node.0, event = %event.name, listeners = matching.len(), "dispatch");
        for listener in &matching {
            listener(event);
        }
        matching.len()
    }

    /// Simulate typing: set the `value` property, then fire `input`.
    pub fn input(&self, node: &NodeId, value: &str) -> usize {
        self.set_property(node, "value", value);
        self.dispatch(node, &HostEvent::new("input").with_target_value(value))
    }

    pub fn click(&self, node: &NodeId) -> usize {
        self.dispatch(node, &HostEvent::new("click"))
    }

    /// Serialize a subtree. Attribute values are not escaped.
    #[must_use]
    pub fn to_markup(&self, node: &NodeId) -> String {
        let mut out = String::new();
        self.write_markup(*node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let (content, children) = {
            let nodes = self.nodes.borrow();
            (nodes[node.0].content.clone(), nodes[node.0].children.clone())
        };
        match content {
            Content::Text(t) => out.push_str(&t),
            Content::Comment(c) => {
                let _ = write!(out, "<!--{c}-->");
            }
            Content::Element {
                tag, attrs, markup, ..
            } => {
                out.push('<');
                out.push_str(&tag);
                for a in &attrs {
                    let _ = write!(out, " {}=\"{}\"", a.name, a.value);
                }
                out.push('>');
                if let Some(markup) = markup {
                    out.push_str(&markup);
                }
                for child in children {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        match selector.strip_prefix('#') {
            Some(id) => self.attribute(&node, "id").is_some_and(|v| v == id),
            None => self.tag(&node).is_some_and(|t| t == selector),
        }
    }

    fn find(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        if self.matches(node, selector) {
            return Some(node);
        }
        let children = self.nodes.borrow()[node.0].children.clone();
        children.into_iter().find_map(|c| self.find(c, selector))
    }

    fn with_element(
        &self,
        node: &NodeId,
        op: &str,
        f: impl FnOnce(&mut Vec<Attribute>, &mut Vec<(String, String)>, &mut Option<String>),
    ) {
        let mut nodes = self.nodes.borrow_mut();
        match &mut nodes[node.0].content {
            Content::Element {
                attrs,
                props,
                markup,
                ..
            } => f(attrs, props, markup),
            Content::Text(_) | Content::Comment(_) => {
                trace!(node = node.0, op, "ignored on non-element");
            }
        }
    }
}

impl HostTree for MemTree {
    type Node = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.roots()
            .into_iter()
            .find_map(|root| self.find(root, selector))
    }

    fn child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    fn node_kind(&self, node: &NodeId) -> NodeKind {
        match self.nodes.borrow()[node.0].content {
            Content::Element { .. } => NodeKind::Element,
            Content::Text(_) => NodeKind::Text,
            Content::Comment(_) => NodeKind::Other,
        }
    }

    fn attributes(&self, node: &NodeId) -> Vec<Attribute> {
        match &self.nodes.borrow()[node.0].content {
            Content::Element { attrs, .. } => attrs.clone(),
            Content::Text(_) | Content::Comment(_) => Vec::new(),
        }
    }

    fn text_content(&self, node: &NodeId) -> String {
        self.text_of(node)
    }

    fn set_text_content(&self, node: &NodeId, text: &str) {
        let is_element = {
            let mut nodes = self.nodes.borrow_mut();
            match &mut nodes[node.0].content {
                Content::Text(t) | Content::Comment(t) => {
                    *t = text.to_string();
                    false
                }
                Content::Element { markup, .. } => {
                    *markup = None;
                    true
                }
            }
        };
        if is_element {
            self.detach_children(*node);
            let child = self.text(text);
            self.append(*node, child);
        }
    }

    fn set_property(&self, node: &NodeId, name: &str, value: &str) {
        self.with_element(node, "set_property", |_, props, _| {
            match props.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => props.push((name.to_string(), value.to_string())),
            }
        });
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.with_element(node, "set_attribute", |attrs, _, _| {
            match attrs.iter_mut().find(|a| a.name == name) {
                Some(attr) => attr.value = value.to_string(),
                None => attrs.push(Attribute::new(name, value)),
            }
        });
    }

    fn set_inner_markup(&self, node: &NodeId, value: &str) {
        let mut replaced = false;
        self.with_element(node, "set_inner_markup", |_, _, markup| {
            *markup = Some(value.to_string());
            replaced = true;
        });
        if replaced {
            self.detach_children(*node);
        }
    }

    fn add_event_listener(&self, node: &NodeId, event: &str, listener: Listener) {
        self.listeners.borrow_mut().push(ListenerEntry {
            node: *node,
            event: event.to_string(),
            listener,
        });
    }
}

impl std::fmt::Debug for MemTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemTree")
            .field("node_count", &self.nodes.borrow().len())
            .field("listener_count", &self.listeners.borrow().len())
            .finish()
    }
}
