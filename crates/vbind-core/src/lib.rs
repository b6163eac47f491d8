#![forbid(unsafe_code)]

//! Reactivity core for vbind.
//!
//! This crate turns a plain model into an observable one and tracks which
//! subscribers depend on which slots:
//!
//! - [`Value`]: the model, a tagged variant over scalars, [`ReactiveMap`] and
//!   [`ReactiveList`].
//! - [`instrument`] / [`define_slot`] / [`attach_slot`]: the observer. Every
//!   own key of a map becomes an observed slot with its own [`Dep`]; lists
//!   route their seven mutating operations through one notify path.
//! - [`Dep`]: the deduplicating registry of subscribers for one slot.
//! - [`Watcher`]: one live binding. Evaluates a [`KeyPath`] with itself
//!   installed in the active-subscriber register ([`active`]) and re-runs its
//!   callback on every notification.
//! - [`Facade`]: flattened, forwarding access to the model plus the method
//!   table used by event bindings.
//!
//! # Architecture
//!
//! Everything is single-threaded and synchronous. Containers are
//! `Rc`-shared handles; a write walks the slot's registry and runs every
//! watcher's callback before returning. Nested writes from callbacks run to
//! completion depth-first.
//!
//! # Invariants
//!
//! 1. A watcher is registered at most once per registry.
//! 2. Writing a value strictly equal to the stored one notifies nobody.
//! 3. A changed value notifies every registered watcher exactly once, in
//!    registration order.
//! 4. Containers written into a slot are instrumented before they are stored.
//! 5. Only the seven list operations notify; index writes do not.
//! 6. The active-subscriber register is empty outside construction-time
//!    evaluation, including after a panic.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use vbind_core::{Facade, Value, Watcher, instrument};
//!
//! let data = instrument(Value::map([("name", "")]));
//! let facade = Facade::with_data(data.as_map().cloned().unwrap());
//! facade.flatten(Facade::DATA);
//!
//! let seen = Rc::new(RefCell::new(String::new()));
//! let sink = Rc::clone(&seen);
//! let _watcher = Watcher::watch(&facade, "name", move |v| *sink.borrow_mut() = v.render())
//!     .unwrap();
//!
//! facade.set("name", "abc").unwrap();
//! assert_eq!(*seen.borrow(), "abc");
//! ```

pub mod active;
pub mod dep;
pub mod error;
pub mod list;
pub mod map;
pub mod observer;
pub mod path;
pub mod proxy;
pub mod value;
pub mod watcher;

pub use active::{is_collecting, untracked};
pub use dep::Dep;
pub use error::PathError;
pub use list::ReactiveList;
pub use map::{ReactiveMap, WeakReactiveMap};
pub use observer::{attach_slot, define_slot, instrument};
pub use path::KeyPath;
pub use proxy::{Facade, FacadeLink, Method};
pub use value::Value;
pub use watcher::{Watcher, WatcherId};
