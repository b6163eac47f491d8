#![forbid(unsafe_code)]

//! Template compiler for vbind.
//!
//! Walks a host tree through the [`HostTree`] trait and wires nodes to a
//! [`vbind_core::Facade`]:
//!
//! | Marker | Effect |
//! |--------|--------|
//! | `{{ expr }}` in a text node | node text follows `expr` |
//! | `v-text="expr"` | element text follows `expr` |
//! | `v-html="expr"` | element inner markup follows `expr` |
//! | `v-model="expr"` | `value` property follows `expr`; `input` events write back |
//! | `v-bind:attr="expr"` | attribute `attr` follows `expr` |
//! | `@event="method"`, `v-on:event="method"` | event calls a façade method |
//!
//! Prefixes and delimiters are configurable through [`TemplateSyntax`].

pub mod binding;
pub mod compiler;
pub mod directive;
pub mod error;
pub mod host;
pub mod syntax;

pub use binding::{Binding, BindingKind, BindingScope};
pub use compiler::{Compiler, MODEL_EVENT, compile};
pub use directive::Directive;
pub use error::CompileError;
pub use host::{Attribute, HostEvent, HostTree, Listener, NodeKind};
pub use syntax::{AttrKind, TemplateSyntax};
