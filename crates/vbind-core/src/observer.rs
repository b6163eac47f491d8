#![forbid(unsafe_code)]

//! Deep instrumentation of model values.
//!
//! The strategy is chosen once per value from its [`Value`] variant:
//!
//! | Variant | Strategy |
//! |---------|----------|
//! | scalar  | returned unchanged |
//! | `Map`   | every own key becomes an observed slot ([`define_slot`]) |
//! | `List`  | the list is marked observed and every item is instrumented |
//!
//! Instrumentation is idempotent: a container that was already walked is
//! left as is, which also stops self-referential models from recursing.

use tracing::debug;

use crate::list::ReactiveList;
use crate::map::ReactiveMap;
use crate::value::Value;

/// Instrument `value` in place and hand it back.
///
/// Non-container values are returned unchanged.
pub fn instrument(value: Value) -> Value {
    match &value {
        Value::Map(map) => observe_map(map),
        Value::List(list) => observe_list(list),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Str(_) => {}
    }
    value
}

fn observe_map(map: &ReactiveMap) {
    if !map.mark_observed() {
        return;
    }
    for (key, value) in map.snapshot() {
        define_slot(map, &key, value);
    }
}

fn observe_list(list: &ReactiveList) {
    if !list.mark_observed() {
        return;
    }
    for item in list.to_vec() {
        instrument(item);
    }
}

/// Convert `key` of `map` into an observed slot holding `value`.
///
/// `value` is instrumented first, so nested containers are reactive before
/// the slot is reachable.
pub fn define_slot(map: &ReactiveMap, key: &str, value: Value) {
    let value = instrument(value);
    map.install_slot(key, value);
}

/// Add a reactive slot to a container after instrumentation.
///
/// This is the only way to make a key that was absent at instrumentation
/// time reactive; a plain [`ReactiveMap::set`] on such a key stores a
/// non-reactive field. On a key that is already a slot this behaves like
/// the slot's set-intercept.
pub fn attach_slot(map: &ReactiveMap, key: &str, value: impl Into<Value>) {
    let value = value.into();
    if map.is_reactive(key) {
        map.set(key, value);
        return;
    }
    debug!(key, "attach slot");
    define_slot(map, key, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::Facade;
    use crate::watcher::Watcher;
    use serde_json::json;
    use tracing_test::traced_test;

    #[test]
    fn scalar_is_returned_unchanged() {
        let v = instrument(Value::from(42));
        assert_eq!(v.as_f64(), Some(42.0));
        assert!(instrument(Value::Null).is_null());
    }

    #[test]
    fn nested_maps_are_instrumented_depth_first() {
        let model = instrument(Value::from(json!({ "name": "", "sex": { "man": 1, "woman": 1 } })));
        let root = model.as_map().unwrap();
        assert!(root.is_observed());
        assert!(root.is_reactive("name"));
        let sex = root.peek("sex").unwrap();
        assert!(sex.as_map().unwrap().is_reactive("man"));
        assert!(sex.as_map().unwrap().is_reactive("woman"));
    }

    #[test]
    fn list_items_are_instrumented() {
        let model = instrument(Value::from(json!([{ "a": 1 }, 2])));
        let list = model.as_list().unwrap();
        assert!(list.is_observed());
        assert!(list.get(0).unwrap().as_map().unwrap().is_reactive("a"));
    }

    #[test]
    fn instrumenting_twice_keeps_registries() {
        let model = instrument(Value::from(json!({ "a": 1 })));
        let map = model.as_map().unwrap().clone();
        let before = map.dep("a").unwrap();
        instrument(model);
        assert!(std::rc::Rc::ptr_eq(&before, &map.dep("a").unwrap()));
    }

    #[test]
    fn attach_slot_on_existing_slot_acts_as_set() {
        let model = instrument(Value::from(json!({ "a": 1 })));
        let map = model.as_map().unwrap().clone();
        let facade = Facade::with_data(map.clone());
        facade.flatten(Facade::DATA);
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        let h = std::rc::Rc::clone(&hits);
        Watcher::watch(&facade, "a", move |_| h.set(h.get() + 1)).unwrap();

        attach_slot(&map, "a", 2);
        assert_eq!(hits.get(), 1);
        attach_slot(&map, "a", 2);
        assert_eq!(hits.get(), 1);
    }

    /// Attaching a slot makes later reads go through the get-intercept,
    /// while a plain write of a new key on a nested map does not.
    #[test]
    #[traced_test]
    fn attached_slot_read_hits_get_intercept() {
        let model = instrument(Value::from(json!({ "name": "", "sex": { "man": 1 } })));
        let root = model.as_map().unwrap();

        let sex = root.peek("sex").unwrap();
        sex.as_map().unwrap().set("age", 1);
        let _ = sex.as_map().unwrap().get("age");
        assert!(!logs_contain("get key=\"age\""));

        attach_slot(root, "age", 18);
        let age = root.get("age");
        assert_eq!(age.and_then(|v| v.as_f64()), Some(18.0));
        assert!(logs_contain("get key=\"age\""));
    }
}
