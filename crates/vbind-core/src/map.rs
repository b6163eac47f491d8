#![forbid(unsafe_code)]

//! Keyed reactive container.
//!
//! [`ReactiveMap`] makes the interception boundary explicit: every read goes
//! through [`ReactiveMap::get`] and every write through [`ReactiveMap::set`].
//! An entry is either a plain field or an observed slot carrying its own
//! [`Dep`]. Only the observer (instrumentation and
//! [`attach_slot`](crate::observer::attach_slot)) turns fields into slots.
//!
//! # Invariants
//!
//! 1. A slot's registry is created once, when the slot is defined, and lives
//!    as long as the entry.
//! 2. Writing a value strictly equal to the stored one is a no-op.
//! 3. A changed slot value is instrumented before it is stored, then the
//!    slot's registry is notified.
//! 4. Writing an absent or plain key stores a plain field: it never
//!    registers a reader and never notifies.
//! 5. No `RefCell` borrow is held while subscriber callbacks run.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::dep::Dep;
use crate::observer;
use crate::value::Value;

struct Entry {
    value: Value,
    dep: Option<Rc<Dep>>,
}

#[derive(Default)]
struct MapInner {
    entries: RefCell<Vec<(String, Entry)>>,
    observed: Cell<bool>,
}

impl MapInner {
    fn position(entries: &[(String, Entry)], key: &str) -> Option<usize> {
        entries.iter().position(|(k, _)| k == key)
    }
}

/// A shared, keyed container whose slots can be observed.
///
/// Cloning creates a new handle to the **same** entries.
#[derive(Clone, Default)]
pub struct ReactiveMap {
    inner: Rc<MapInner>,
}

impl ReactiveMap {
    /// Create an empty, un-instrumented map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an un-instrumented map holding plain fields.
    ///
    /// Later duplicates of a key overwrite earlier ones.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let map = Self::new();
        for (key, value) in entries {
            map.store_plain(key.into(), value.into());
        }
        map
    }

    /// Slot get-intercept.
    ///
    /// Returns the stored value. For an observed slot, the active watcher
    /// (if any) is registered with the slot; when the value is a list it is
    /// also registered with the list's own registry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        let (value, dep) = {
            let entries = self.inner.entries.borrow();
            let idx = MapInner::position(&entries, key)?;
            let entry = &entries[idx].1;
            (entry.value.clone(), entry.dep.clone())
        };
        if let Some(dep) = dep {
            trace!(key, "get");
            dep.depend();
            if let Value::List(list) = &value {
                list.dep().depend();
            }
        }
        Some(value)
    }

    /// Read without touching any registry.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<Value> {
        let entries = self.inner.entries.borrow();
        MapInner::position(&entries, key).map(|idx| entries[idx].1.value.clone())
    }

    /// Slot set-intercept.
    ///
    /// On an observed slot, a strictly-unequal value is instrumented, stored
    /// and announced to every registered watcher. On an absent or plain key
    /// the value is stored as a plain field.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.dep(key) {
            Some(dep) => self.write_slot(key, value, &dep),
            None => {
                debug!(key, "plain field write");
                self.store_plain(key.to_string(), value);
            }
        }
    }

    fn write_slot(&self, key: &str, value: Value, dep: &Dep) {
        let unchanged = self
            .peek(key)
            .is_some_and(|current| current.strict_eq(&value));
        if unchanged {
            debug!(key, "set skipped, value unchanged");
            return;
        }
        let value = observer::instrument(value);
        {
            let mut entries = self.inner.entries.borrow_mut();
            if let Some(idx) = MapInner::position(&entries, key) {
                entries[idx].1.value = value;
            }
        }
        debug!(key, subscribers = dep.len(), "set");
        dep.notify();
    }

    fn store_plain(&self, key: String, value: Value) {
        let mut entries = self.inner.entries.borrow_mut();
        match MapInner::position(&entries, &key) {
            Some(idx) => entries[idx].1.value = value,
            None => entries.push((key, Entry { value, dep: None })),
        }
    }

    /// Turn `key` into an observed slot holding `value`.
    ///
    /// `value` must already be instrumented. An existing slot keeps its
    /// registry.
    pub(crate) fn install_slot(&self, key: &str, value: Value) {
        let mut entries = self.inner.entries.borrow_mut();
        match MapInner::position(&entries, key) {
            Some(idx) => {
                let entry = &mut entries[idx].1;
                entry.value = value;
                if entry.dep.is_none() {
                    entry.dep = Some(Rc::new(Dep::new()));
                }
            }
            None => entries.push((
                key.to_string(),
                Entry {
                    value,
                    dep: Some(Rc::new(Dep::new())),
                },
            )),
        }
    }

    /// Mark the map observed. Returns `false` if it already was.
    pub(crate) fn mark_observed(&self) -> bool {
        !self.inner.observed.replace(true)
    }

    /// Whether the observer has walked this map.
    #[must_use]
    pub fn is_observed(&self) -> bool {
        self.inner.observed.get()
    }

    /// Whether `key` is an observed slot (as opposed to a plain field).
    #[must_use]
    pub fn is_reactive(&self, key: &str) -> bool {
        self.dep(key).is_some()
    }

    /// The registry attached to `key`, if it is an observed slot.
    #[must_use]
    pub fn dep(&self, key: &str) -> Option<Rc<Dep>> {
        let entries = self.inner.entries.borrow();
        MapInner::position(&entries, key).and_then(|idx| entries[idx].1.dep.clone())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        MapInner::position(&self.inner.entries.borrow(), key).is_some()
    }

    /// Own keys in insertion order. Does not register anything.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Untracked copy of every entry, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|(k, e)| (k.clone(), e.value.clone()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Whether both handles point to the same map.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning handle to the same entries.
    #[must_use]
    pub fn downgrade(&self) -> WeakReactiveMap {
        WeakReactiveMap(Rc::downgrade(&self.inner))
    }
}

/// Non-owning map handle used by the façade's property table.
#[derive(Clone, Default)]
pub struct WeakReactiveMap(Weak<MapInner>);

impl WeakReactiveMap {
    #[must_use]
    pub fn upgrade(&self) -> Option<ReactiveMap> {
        self.0.upgrade().map(|inner| ReactiveMap { inner })
    }
}

impl std::fmt::Debug for ReactiveMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveMap")
            .field("keys", &self.keys())
            .field("observed", &self.is_observed())
            .finish()
    }
}
