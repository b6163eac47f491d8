#![forbid(unsafe_code)]

//! Test harness for vbind.
//!
//! [`MemTree`] is an in-memory [`vbind_template::HostTree`]: build a tree
//! with [`MemTree::el`] and [`MemTree::text`], bind it, then drive it with
//! [`MemTree::input`] / [`MemTree::click`] and inspect it with
//! [`MemTree::text_of`], [`MemTree::property`], [`MemTree::attribute`] or
//! [`MemTree::to_markup`].

pub mod mem_tree;

pub use mem_tree::{MemTree, NodeId};
