#![forbid(unsafe_code)]

//! The active-subscriber register.
//!
//! While a [`Watcher`] evaluates its expression it is installed here, and
//! every slot get-intercept consults this register to decide whom to
//! register. Dependency collection is therefore implicit: reads never take
//! the watcher as an argument.
//!
//! # Invariants
//!
//! 1. **Thread-local**: evaluation is synchronous and single-threaded; the
//!    register is never shared across threads.
//! 2. **Scoped**: the register is only changed through [`ActiveScope`],
//!    which restores the previous occupant on drop, including during
//!    unwinding. A panic inside evaluation can not leave a stale watcher
//!    behind.
//! 3. **Single occupant**: at most one watcher is active at a time.

use std::cell::RefCell;

use crate::watcher::Watcher;

thread_local! {
    static ACTIVE: RefCell<Option<Watcher>> = const { RefCell::new(None) };
}

/// The watcher currently collecting dependencies, if any.
#[must_use]
pub fn current() -> Option<Watcher> {
    ACTIVE.with(|slot| slot.borrow().clone())
}

/// Whether a watcher is currently collecting dependencies.
#[must_use]
pub fn is_collecting() -> bool {
    ACTIVE.with(|slot| slot.borrow().is_some())
}

/// Run `f` with the register empty, so reads inside it register nothing.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _scope = ActiveScope::suspend();
    f()
}

/// RAII guard over the register. Dropping it restores the prior occupant.
#[must_use = "dropping this guard restores the previous active watcher"]
pub(crate) struct ActiveScope {
    previous: Option<Watcher>,
}

impl ActiveScope {
    /// Install `watcher` as the active subscriber.
    pub(crate) fn enter(watcher: &Watcher) -> Self {
        Self::swap(Some(watcher.clone()))
    }

    /// Empty the register for the lifetime of the guard.
    pub(crate) fn suspend() -> Self {
        Self::swap(None)
    }

    fn swap(next: Option<Watcher>) -> Self {
        let previous = ACTIVE.with(|slot| slot.replace(next));
        Self { previous }
    }
}

impl Drop for ActiveScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|slot| {
            *slot.borrow_mut() = previous;
        });
    }
}
