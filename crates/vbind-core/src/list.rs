#![forbid(unsafe_code)]

//! Ordered reactive container.
//!
//! [`ReactiveList`] owns its items and exposes the seven length/order
//! mutating operations itself: [`push`](ReactiveList::push),
//! [`pop`](ReactiveList::pop), [`shift`](ReactiveList::shift),
//! [`unshift`](ReactiveList::unshift), [`sort`](ReactiveList::sort),
//! [`reverse`](ReactiveList::reverse) and [`splice`](ReactiveList::splice).
//! Once the list is observed, each of them mutates, instruments any newly
//! introduced elements, then issues exactly one notification on the list's
//! registry.
//!
//! # Limitations
//!
//! Indexed reads ([`get`](ReactiveList::get)) and writes
//! ([`set`](ReactiveList::set)) are not intercepted: an index write never
//! notifies. Watchers reach the list registry by reading the slot that holds
//! the list.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::rc::Rc;

use tracing::debug;

use crate::dep::Dep;
use crate::observer;
use crate::value::Value;

#[derive(Default)]
struct ListInner {
    items: RefCell<Vec<Value>>,
    observed: Cell<bool>,
    dep: Dep,
}

/// A shared sequence whose mutating operations notify subscribers.
///
/// Cloning creates a new handle to the **same** items and registry.
#[derive(Clone, Default)]
pub struct ReactiveList {
    inner: Rc<ListInner>,
}

impl ReactiveList {
    /// Create an empty, un-instrumented list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an un-instrumented list from items.
    pub fn from_items<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        let list = Self::new();
        list.inner
            .items
            .borrow_mut()
            .extend(items.into_iter().map(Into::into));
        list
    }

    /// The sequence-level registry.
    #[must_use]
    pub fn dep(&self) -> &Dep {
        &self.inner.dep
    }

    /// Item at `index`. Not intercepted.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.inner.items.borrow().get(index).cloned()
    }

    /// Plain index assignment. Never notifies and never instruments.
    ///
    /// Writing past the end pads the gap with `Value::Null`.
    pub fn set(&self, index: usize, value: impl Into<Value>) {
        let mut items = self.inner.items.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Null);
        }
        items[index] = value.into();
    }

    /// Append one item. Returns the new length.
    pub fn push(&self, value: impl Into<Value>) -> usize {
        let value = value.into();
        self.mutate("push", |items| {
            items.push(value.clone());
            (items.len(), vec![value])
        })
    }

    /// Remove and return the last item.
    pub fn pop(&self) -> Option<Value> {
        self.mutate("pop", |items| (items.pop(), Vec::new()))
    }

    /// Remove and return the first item.
    pub fn shift(&self) -> Option<Value> {
        self.mutate("shift", |items| {
            let first = if items.is_empty() {
                None
            } else {
                Some(items.remove(0))
            };
            (first, Vec::new())
        })
    }

    /// Insert one item at the front. Returns the new length.
    pub fn unshift(&self, value: impl Into<Value>) -> usize {
        let value = value.into();
        self.mutate("unshift", |items| {
            items.insert(0, value.clone());
            (items.len(), vec![value])
        })
    }

    /// Stable sort by rendered text, the default ordering of the reference
    /// host language. `Null` items sort last.
    pub fn sort(&self) {
        self.sort_by(|a, b| match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.render().cmp(&b.render()),
        });
    }

    /// Stable sort with a comparator.
    pub fn sort_by(&self, compare: impl FnMut(&Value, &Value) -> Ordering) {
        self.mutate("sort", |items| {
            items.sort_by(compare);
            ((), Vec::new())
        });
    }

    pub fn reverse(&self) {
        self.mutate("reverse", |items| {
            items.reverse();
            ((), Vec::new())
        });
    }

    /// Remove `delete_count` items starting at `start` and insert `insert`
    /// in their place. Both bounds are clamped to the current length.
    /// Returns the removed items.
    pub fn splice(
        &self,
        start: usize,
        delete_count: usize,
        insert: impl IntoIterator<Item = Value>,
    ) -> Vec<Value> {
        let insert: Vec<Value> = insert.into_iter().collect();
        self.mutate("splice", |items| {
            let start = start.min(items.len());
            let end = start.saturating_add(delete_count).min(items.len());
            let removed: Vec<Value> = items.splice(start..end, insert.iter().cloned()).collect();
            (removed, insert.clone())
        })
    }

    /// Single notify-after-mutate path for the seven operations.
    ///
    /// `f` returns its result plus the elements it introduced; those are
    /// instrumented after the borrow is released, then the registry is
    /// notified once.
    fn mutate<R>(&self, op: &'static str, f: impl FnOnce(&mut Vec<Value>) -> (R, Vec<Value>)) -> R {
        let (result, inserted) = {
            let mut items = self.inner.items.borrow_mut();
            f(&mut items)
        };
        if !self.is_observed() {
            return result;
        }
        for value in inserted {
            observer::instrument(value);
        }
        debug!(op, len = self.len(), subscribers = self.inner.dep.len(), "list mutation");
        self.inner.dep.notify();
        result
    }

    /// Mark the list observed. Returns `false` if it already was.
    pub(crate) fn mark_observed(&self) -> bool {
        !self.inner.observed.replace(true)
    }

    #[must_use]
    pub fn is_observed(&self) -> bool {
        self.inner.observed.get()
    }

    /// Untracked copy of the items.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.inner.items.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// Whether both handles point to the same list.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for ReactiveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveList")
            .field("len", &self.len())
            .field("observed", &self.is_observed())
            .field("subscriber_count", &self.inner.dep.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::ReactiveMap;
    use crate::observer::instrument;
    use crate::proxy::Facade;
    use crate::watcher::Watcher;

    fn numbers(list: &ReactiveList) -> Vec<f64> {
        list.to_vec().iter().filter_map(Value::as_f64).collect()
    }

    fn bound(items: Vec<i32>) -> (Facade, ReactiveList, Rc<Cell<u32>>) {
        let list = ReactiveList::from_items(items);
        let data = ReactiveMap::from_entries([("items", Value::List(list.clone()))]);
        instrument(Value::Map(data.clone()));
        let facade = Facade::with_data(data);
        facade.flatten(Facade::DATA);
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        Watcher::watch(&facade, "items", move |_| c.set(c.get() + 1)).unwrap();
        (facade, list, calls)
    }

    #[test]
    fn each_mutating_operation_notifies_once() {
        let (_facade, list, calls) = bound(vec![3, 1, 2]);

        assert_eq!(list.push(4), 4);
        assert_eq!(calls.get(), 1);
        assert_eq!(list.pop().and_then(|v| v.as_f64()), Some(4.0));
        assert_eq!(calls.get(), 2);
        assert_eq!(list.shift().and_then(|v| v.as_f64()), Some(3.0));
        assert_eq!(calls.get(), 3);
        assert_eq!(list.unshift(9), 3);
        assert_eq!(calls.get(), 4);
        list.sort();
        assert_eq!(calls.get(), 5);
        assert_eq!(numbers(&list), vec![1.0, 2.0, 9.0]);
        list.reverse();
        assert_eq!(calls.get(), 6);
        let removed = list.splice(1, 1, vec![Value::from(7), Value::from(8)]);
        assert_eq!(calls.get(), 7);
        assert_eq!(removed.len(), 1);
        assert_eq!(numbers(&list), vec![9.0, 7.0, 8.0, 1.0]);
    }

    #[test]
    fn index_assignment_does_not_notify() {
        let (_facade, list, calls) = bound(vec![1, 2]);
        list.set(0, 100);
        assert_eq!(calls.get(), 0);
        assert_eq!(numbers(&list), vec![100.0, 2.0]);
    }

    #[test]
    fn index_assignment_past_end_pads_with_null() {
        let list = ReactiveList::from_items([1]);
        list.set(3, 4);
        assert_eq!(list.len(), 4);
        assert!(list.get(1).unwrap().is_null());
    }

    #[test]
    fn pushed_containers_become_reactive() {
        let (_facade, list, _calls) = bound(vec![]);
        let item = Value::map([("done", false)]);
        list.push(item.clone());
        assert!(item.as_map().unwrap().is_reactive("done"));
    }

    #[test]
    fn unobserved_list_mutations_are_silent() {
        let list = ReactiveList::from_items([Value::map([("a", 1)])]);
        list.push(Value::map([("b", 2)]));
        assert!(!list.is_observed());
        assert!(!list.get(1).unwrap().as_map().unwrap().is_observed());
    }

    #[test]
    fn pop_and_shift_on_empty_return_none() {
        let (_facade, list, calls) = bound(vec![]);
        assert!(list.pop().is_none());
        assert!(list.shift().is_none());
        // Still a mutation call: notification is unconditional.
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn splice_clamps_bounds() {
        let list = ReactiveList::from_items([1, 2, 3]);
        let removed = list.splice(2, 10, Vec::new());
        assert_eq!(removed.len(), 1);
        let removed = list.splice(99, 1, vec![Value::from(4)]);
        assert!(removed.is_empty());
        assert_eq!(numbers(&list), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn default_sort_is_textual() {
        let list = ReactiveList::from_items([10, 9, 1]);
        list.sort();
        assert_eq!(numbers(&list), vec![1.0, 10.0, 9.0]);
    }
}
