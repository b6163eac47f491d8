#![forbid(unsafe_code)]

//! The façade: flat, forwarding access to nested model properties.
//!
//! A [`Facade`] owns named containers (the instrumented data lives under
//! [`Facade::DATA`]) and a table of flattened properties. After
//! [`Facade::flatten`], `facade.get("name")` forwards to
//! `facade["$data"].get("name")`, so binding expressions can use top-level
//! names.
//!
//! # Invariants
//!
//! 1. Flattening never creates observed slots; every forwarded read or
//!    write goes through the underlying slot's intercepts.
//! 2. Flattening is idempotent: re-flattening redefines the same targets.
//! 3. Methods are looked up by name; an absent method is `None`, never a
//!    placeholder.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::PathError;
use crate::map::{ReactiveMap, WeakReactiveMap};
use crate::path::KeyPath;
use crate::value::Value;

/// A method callable from event bindings: receives the façade and the
/// event payload.
pub type Method = Rc<dyn Fn(&Facade, &Value)>;

#[derive(Clone)]
struct ProxyTarget {
    container: WeakReactiveMap,
    key: String,
}

/// Tables shared by every handle. Containers are referenced weakly so that
/// watchers living inside the model can hold the tables without a cycle.
#[derive(Default)]
struct FacadeInner {
    containers: RefCell<Vec<(String, WeakReactiveMap)>>,
    props: RefCell<HashMap<String, ProxyTarget>>,
    methods: RefCell<HashMap<String, Method>>,
}

type Roots = RefCell<Vec<(String, ReactiveMap)>>;

/// Flattened view over the model, plus the method table.
///
/// Cloning creates a new handle to the **same** façade. A façade keeps its
/// mounted containers alive.
#[derive(Clone, Default)]
pub struct Facade {
    inner: Rc<FacadeInner>,
    roots: Rc<Roots>,
}

/// Handle held by watchers and host listeners.
///
/// A link keeps the property and method tables but not the model: it
/// resolves properties for as long as the mounted containers are alive,
/// whether or not any [`Facade`] handle remains.
#[derive(Clone)]
pub struct FacadeLink {
    inner: Rc<FacadeInner>,
    roots: Weak<Roots>,
}

impl FacadeLink {
    /// A façade handle over the same tables.
    ///
    /// While an owning handle exists the result shares its mounts;
    /// afterwards it resolves only containers kept alive elsewhere.
    #[must_use]
    pub fn facade(&self) -> Facade {
        Facade {
            inner: Rc::clone(&self.inner),
            roots: self.roots.upgrade().unwrap_or_default(),
        }
    }

    /// Whether any mounted container is still alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.inner
            .containers
            .borrow()
            .iter()
            .any(|(_, c)| c.upgrade().is_some())
    }
}

impl std::fmt::Debug for FacadeLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacadeLink")
            .field("live", &self.is_live())
            .finish()
    }
}

impl Facade {
    /// Container name under which the model is mounted.
    pub const DATA: &'static str = "$data";

    /// Create an empty façade.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a façade with `data` mounted under [`Facade::DATA`].
    ///
    /// The data is not flattened; call [`Facade::flatten`].
    #[must_use]
    pub fn with_data(data: ReactiveMap) -> Self {
        let facade = Self::new();
        facade.mount(Self::DATA, data);
        facade
    }

    /// Mount `container` under `name`, replacing any previous mount.
    pub fn mount(&self, name: &str, container: ReactiveMap) {
        let weak = container.downgrade();
        replace_named(&mut self.roots.borrow_mut(), name, container);
        replace_named(&mut self.inner.containers.borrow_mut(), name, weak);
    }

    /// The container mounted under `name`.
    #[must_use]
    pub fn container(&self, name: &str) -> Option<ReactiveMap> {
        self.inner
            .containers
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, c)| c.upgrade())
    }

    /// The model, if mounted.
    #[must_use]
    pub fn data(&self) -> Option<ReactiveMap> {
        self.container(Self::DATA)
    }

    /// Define a forwarding property on the façade for every key of the
    /// container mounted under `container_name`.
    ///
    /// Returns the number of properties defined (0 if nothing is mounted
    /// under that name).
    pub fn flatten(&self, container_name: &str) -> usize {
        let Some(container) = self.container(container_name) else {
            debug!(container = container_name, "flatten skipped, nothing mounted");
            return 0;
        };
        let keys = container.keys();
        let mut props = self.inner.props.borrow_mut();
        for key in &keys {
            props.insert(
                key.clone(),
                ProxyTarget {
                    container: container.downgrade(),
                    key: key.clone(),
                },
            );
        }
        debug!(container = container_name, count = keys.len(), "flatten");
        keys.len()
    }

    /// Whether `name` is a flattened property.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.inner.props.borrow().contains_key(name)
    }

    /// Flattened property names, sorted.
    #[must_use]
    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.props.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    fn target(&self, name: &str) -> Option<ProxyTarget> {
        self.inner.props.borrow().get(name).cloned()
    }

    /// Forwarded read of a flattened property. Unknown names read as
    /// `Value::Null`.
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.target(name)
            .and_then(|t| t.container.upgrade()?.get(&t.key))
            .unwrap_or_default()
    }

    /// Forwarded write of a flattened property.
    ///
    /// # Errors
    ///
    /// [`PathError::Unresolved`] if `name` is not a flattened property.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), PathError> {
        let unresolved = || PathError::Unresolved {
            path: name.to_string(),
        };
        let target = self.target(name).ok_or_else(unresolved)?;
        let container = target.container.upgrade().ok_or_else(unresolved)?;
        container.set(&target.key, value);
        Ok(())
    }

    /// Evaluate a key path: the head through the façade, later segments
    /// through map keys or list indices. Unresolvable paths yield
    /// `Value::Null`.
    #[must_use]
    pub fn evaluate(&self, path: &KeyPath) -> Value {
        let mut current = self.get(path.head());
        for segment in path.rest() {
            current = step(&current, segment).unwrap_or_default();
        }
        current
    }

    /// Write `value` at `path` through the owning container.
    ///
    /// # Errors
    ///
    /// [`PathError::Unresolved`] if the parent of the last segment is not a
    /// container (or the head is not a flattened property).
    pub fn assign(&self, path: &KeyPath, value: impl Into<Value>) -> Result<(), PathError> {
        if path.is_simple() {
            return self.set(path.head(), value);
        }
        let unresolved = || PathError::Unresolved {
            path: path.to_string(),
        };
        let (parents, last) = path.split_last();
        let mut parent = self.get(&parents[0]);
        for segment in &parents[1..] {
            parent = step(&parent, segment).ok_or_else(unresolved)?;
        }
        match &parent {
            Value::Map(map) => {
                map.set(last, value);
                Ok(())
            }
            Value::List(list) => {
                let index = last.parse::<usize>().map_err(|_| unresolved())?;
                list.set(index, value);
                Ok(())
            }
            _ => Err(unresolved()),
        }
    }

    /// Register a method under `name`, replacing any previous one.
    pub fn define_method(&self, name: &str, method: impl Fn(&Facade, &Value) + 'static) {
        self.insert_method(name, Rc::new(method));
    }

    /// Register an already shared method under `name`.
    pub fn insert_method(&self, name: &str, method: Method) {
        self.inner
            .methods
            .borrow_mut()
            .insert(name.to_string(), method);
    }

    /// Look up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<Method> {
        self.inner.methods.borrow().get(name).cloned()
    }

    /// Invoke `name` with `payload`. Returns `false` if no such method.
    pub fn call(&self, name: &str, payload: &Value) -> bool {
        match self.method(name) {
            Some(method) => {
                method(self, payload);
                true
            }
            None => false,
        }
    }

    /// A link to this façade's tables that does not own the model.
    #[must_use]
    pub fn link(&self) -> FacadeLink {
        FacadeLink {
            inner: Rc::clone(&self.inner),
            roots: Rc::downgrade(&self.roots),
        }
    }

    /// Whether both handles point to the same façade.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn replace_named<T>(entries: &mut Vec<(String, T)>, name: &str, item: T) {
    match entries.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = item,
        None => entries.push((name.to_string(), item)),
    }
}

/// One path hop. Map hops go through the get-intercept.
fn step(current: &Value, segment: &str) -> Option<Value> {
    match current {
        Value::Map(map) => map.get(segment),
        Value::List(list) => segment.parse::<usize>().ok().and_then(|i| list.get(i)),
        _ => None,
    }
}

impl std::fmt::Debug for Facade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut methods: Vec<String> = self.inner.methods.borrow().keys().cloned().collect();
        methods.sort();
        f.debug_struct("Facade")
            .field("properties", &self.property_names())
            .field("methods", &methods)
            .finish()
    }
}
