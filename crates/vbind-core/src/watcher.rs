#![forbid(unsafe_code)]

//! Subscribers: one live binding each.
//!
//! A [`Watcher`] is built from a façade, a key path and an update callback.
//! Construction evaluates the path once with the watcher installed in the
//! active-subscriber register, so every slot read along the path registers
//! it. [`Watcher::update`] re-evaluates with the register emptied and hands
//! the fresh value to the callback.
//!
//! # Ownership
//!
//! Registries hold strong watcher handles and watchers hold a
//! [`FacadeLink`], which keeps the façade's tables but not the model. A
//! watcher therefore keeps updating for as long as the model is reachable,
//! whether or not the façade that built it survives, and dropping the model
//! releases every registry and every watcher.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::active::{self, ActiveScope};
use crate::error::PathError;
use crate::path::KeyPath;
use crate::proxy::{Facade, FacadeLink};
use crate::value::Value;

/// Global counter for watcher ids.
static WATCHER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatcherId(u64);

impl WatcherId {
    fn next() -> Self {
        Self(WATCHER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

struct WatcherInner {
    id: WatcherId,
    link: FacadeLink,
    path: KeyPath,
    callback: Box<dyn Fn(&Value)>,
}

/// A live binding that re-renders whenever a slot it read changes.
///
/// Cloning shares the same watcher (same id).
#[derive(Clone)]
pub struct Watcher {
    inner: Rc<WatcherInner>,
}

impl Watcher {
    /// Create a watcher and collect its dependencies.
    ///
    /// The callback is not invoked here; callers render the initial value
    /// themselves (or via [`Watcher::value`]).
    pub fn new(facade: &Facade, path: KeyPath, callback: impl Fn(&Value) + 'static) -> Self {
        let watcher = Self {
            inner: Rc::new(WatcherInner {
                id: WatcherId::next(),
                link: facade.link(),
                path,
                callback: Box::new(callback),
            }),
        };
        {
            let _scope = ActiveScope::enter(&watcher);
            let _ = facade.evaluate(&watcher.inner.path);
        }
        trace!(watcher = watcher.id().get(), path = %watcher.inner.path, "collected");
        watcher
    }

    /// Parse `expr` and create a watcher for it.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if `expr` is not a valid key path.
    pub fn watch(
        facade: &Facade,
        expr: &str,
        callback: impl Fn(&Value) + 'static,
    ) -> Result<Self, PathError> {
        let path = KeyPath::parse(expr)?;
        Ok(Self::new(facade, path, callback))
    }

    #[must_use]
    pub fn id(&self) -> WatcherId {
        self.inner.id
    }

    #[must_use]
    pub fn path(&self) -> &KeyPath {
        &self.inner.path
    }

    /// Current value of the expression, read without collecting.
    ///
    /// Returns `Value::Null` once the model has been dropped.
    #[must_use]
    pub fn value(&self) -> Value {
        let facade = self.inner.link.facade();
        active::untracked(|| facade.evaluate(&self.inner.path))
    }

    /// Re-evaluate and invoke the update callback.
    ///
    /// Dependencies are not re-collected: a slot first reached after a
    /// parent container was replaced does not register this watcher.
    pub fn update(&self) {
        let value = self.value();
        (self.inner.callback)(&value);
    }
}

impl std::fmt::Debug for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("id", &self.inner.id)
            .field("path", &self.inner.path.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::ReactiveMap;
    use crate::observer::instrument;
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    fn reactive_facade(json: serde_json::Value) -> (Facade, ReactiveMap) {
        let data = Value::from(json);
        instrument(data.clone());
        let map = data.as_map().cloned().unwrap();
        let facade = Facade::with_data(map.clone());
        facade.flatten(Facade::DATA);
        (facade, map)
    }

    #[test]
    fn construction_registers_with_every_slot_on_path() {
        let (facade, data) = reactive_facade(json!({ "user": { "name": "ann" } }));
        let watcher = Watcher::watch(&facade, "user.name", |_| {}).unwrap();

        assert!(data.dep("user").unwrap().contains(watcher.id()));
        let user = data.peek("user").unwrap();
        assert!(user.as_map().unwrap().dep("name").unwrap().contains(watcher.id()));
        assert!(!active::is_collecting());
    }

    #[test]
    fn construction_does_not_invoke_callback() {
        let (facade, _) = reactive_facade(json!({ "a": 1 }));
        let calls = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&calls);
        let _w = Watcher::watch(&facade, "a", move |_| c.set(c.get() + 1)).unwrap();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn update_passes_current_value() {
        let (facade, data) = reactive_facade(json!({ "a": 1 }));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _w = Watcher::watch(&facade, "a", move |v| s.borrow_mut().push(v.render())).unwrap();

        data.set("a", 2);
        data.set("a", 3);
        assert_eq!(*seen.borrow(), vec!["2", "3"]);
    }

    #[test]
    fn update_does_not_collect() {
        let (facade, data) = reactive_facade(json!({ "a": 1, "b": 1 }));
        let probe = Watcher::watch(&facade, "b", |_| {}).unwrap();
        let observed = Rc::new(Cell::new(false));
        let o = Rc::clone(&observed);
        let _w = Watcher::watch(&facade, "a", move |_| o.set(active::is_collecting())).unwrap();

        data.set("a", 5);
        assert!(!observed.get(), "register must be empty during update");
        assert_eq!(data.dep("b").unwrap().subscriber_ids(), vec![probe.id()]);
    }

    #[test]
    fn repeated_updates_do_not_duplicate_registration() {
        let (facade, data) = reactive_facade(json!({ "a": 1 }));
        let w = Watcher::watch(&facade, "a", |_| {}).unwrap();
        for i in 0..5 {
            data.set("a", i + 10);
        }
        assert_eq!(data.dep("a").unwrap().subscriber_ids(), vec![w.id()]);
    }

    #[test]
    fn updates_continue_after_facade_is_dropped() {
        let (facade, data) = reactive_facade(json!({ "a": 1 }));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let w = Watcher::watch(&facade, "a", move |v| s.borrow_mut().push(v.render())).unwrap();
        drop(facade);

        data.set("a", 2);
        data.set("a", 3);
        assert_eq!(*seen.borrow(), vec!["2", "3"]);
        assert_eq!(w.value().as_f64(), Some(3.0));
    }

    #[test]
    fn watcher_reads_null_once_model_is_gone() {
        let (facade, data) = reactive_facade(json!({ "a": 1 }));
        let w = Watcher::watch(&facade, "a", |_| {}).unwrap();
        drop(facade);
        drop(data);
        assert!(w.value().is_null());
    }

    #[test]
    fn replaced_parent_leaves_nested_watcher_stale() {
        let (facade, data) = reactive_facade(json!({ "user": { "name": "a" } }));
        let calls = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&calls);
        let w = Watcher::watch(&facade, "user.name", move |_| c.set(c.get() + 1)).unwrap();

        let fresh = Value::map([("name", "b")]);
        data.set("user", fresh.clone());
        assert_eq!(calls.get(), 1);

        let fresh = fresh.as_map().cloned().unwrap();
        fresh.set("name", "c");
        assert_eq!(calls.get(), 1, "update does not re-collect dependencies");
        assert!(!fresh.dep("name").unwrap().contains(w.id()));
        assert_eq!(w.value().as_str(), Some("c"));
    }

    #[test]
    fn ids_are_unique() {
        let (facade, _) = reactive_facade(json!({ "a": 1 }));
        let a = Watcher::watch(&facade, "a", |_| {}).unwrap();
        let b = Watcher::watch(&facade, "a", |_| {}).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn invalid_expression_is_rejected() {
        let (facade, _) = reactive_facade(json!({}));
        assert!(Watcher::watch(&facade, "  ", |_| {}).is_err());
    }
}
