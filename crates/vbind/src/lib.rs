#![forbid(unsafe_code)]

//! vbind: reactive data binding between a model and a host document tree.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`reactivity`]: observable model, dependency registries, watchers, façade.
//! - [`template`]: host-tree trait and the template compiler.
//! - [`runtime`] (feature `runtime`, on by default): [`BoundView`] and
//!   [`ViewConfig`].
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use vbind::prelude::*;
//! use vbind_harness::MemTree;
//!
//! let tree = Rc::new(MemTree::new());
//! let text = tree.text("{{ name }}");
//! let p = tree.el("p", &[], &[text]);
//! tree.el("div", &[("id", "app")], &[p]);
//!
//! let view = BoundView::new(
//!     Rc::clone(&tree),
//!     ViewConfig::new(serde_json::json!({ "name": "" })).mount("#app"),
//! )
//! .unwrap();
//! view.facade().set("name", "abc").unwrap();
//! assert_eq!(tree.text_of(&p), "abc");
//! ```

pub use vbind_core as reactivity;
pub use vbind_template as template;

#[cfg(feature = "runtime")]
pub use vbind_runtime as runtime;

pub use vbind_core::{
    Facade, KeyPath, PathError, ReactiveList, ReactiveMap, Value, Watcher, attach_slot,
    instrument,
};
pub use vbind_template::{CompileError, HostEvent, HostTree, TemplateSyntax};

#[cfg(feature = "runtime")]
pub use vbind_runtime::{BoundView, ViewConfig, ViewError, create_bound_view};

/// Common imports.
pub mod prelude {
    pub use vbind_core::{Facade, ReactiveList, ReactiveMap, Value, Watcher, attach_slot};
    pub use vbind_template::{HostEvent, HostTree};

    #[cfg(feature = "runtime")]
    pub use vbind_runtime::{BoundView, ViewConfig, ViewError};
}
