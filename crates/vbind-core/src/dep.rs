#![forbid(unsafe_code)]

//! Dependency registry: the set of subscribers interested in one slot.
//!
//! # Invariants
//!
//! 1. A [`Watcher`] appears at most once per registry (registration is
//!    keyed by [`WatcherId`]); repeated reads during one evaluation do not
//!    duplicate notifications.
//! 2. [`Dep::notify`] calls subscribers in registration order, synchronously,
//!    on the caller's stack.
//! 3. There is no unsubscribe path: a registered watcher stays for the
//!    lifetime of the registry.
//!
//! # Failure Modes
//!
//! - **Self-triggering chains**: an update callback that writes back into a
//!   slot it depends on recurses until the stack is exhausted. Nested
//!   notifications run to completion before the outer loop resumes.

use std::cell::RefCell;

use tracing::trace;

use crate::active;
use crate::watcher::{Watcher, WatcherId};

/// Subscribers registered with one observed slot (or one sequence).
#[derive(Default)]
pub struct Dep {
    subscribers: RefCell<Vec<Watcher>>,
}

impl Dep {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `watcher` if it is not already present.
    ///
    /// Returns `true` when the watcher was newly added.
    pub fn register(&self, watcher: &Watcher) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        if subscribers.iter().any(|w| w.id() == watcher.id()) {
            return false;
        }
        trace!(watcher = watcher.id().get(), "register");
        subscribers.push(watcher.clone());
        true
    }

    /// Register the active watcher, if one is collecting dependencies.
    pub fn depend(&self) {
        if let Some(watcher) = active::current() {
            self.register(&watcher);
        }
    }

    /// Run every registered watcher's update, in registration order.
    ///
    /// The subscriber list is snapshotted first so callbacks may read or
    /// write other slots (and register with this one) without conflicting
    /// borrows.
    pub fn notify(&self) {
        let subscribers: Vec<Watcher> = self.subscribers.borrow().clone();
        for watcher in &subscribers {
            watcher.update();
        }
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: WatcherId) -> bool {
        self.subscribers.borrow().iter().any(|w| w.id() == id)
    }

    /// Registered watcher ids, in registration order.
    #[must_use]
    pub fn subscriber_ids(&self) -> Vec<WatcherId> {
        self.subscribers.borrow().iter().map(Watcher::id).collect()
    }

    /// Number of registered watchers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.borrow().is_empty()
    }
}

impl std::fmt::Debug for Dep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dep")
            .field("subscriber_count", &self.len())
            .finish()
    }
}
