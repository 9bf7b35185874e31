//! Memoized event objects and named-event dispatch.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

use domview_core::alloc::HashMap;

use crate::dom::Dom;

thread_local! {
    static GLOBAL_REGISTRIES: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Table holding one event object per event name.
///
/// Entries are never evicted; the key space is the handful of event names an
/// application triggers. Clones share the same table.
pub struct EventRegistry<Ev> {
    cache: Rc<RefCell<HashMap<String, Rc<Ev>>>>,
}

impl<Ev> Clone for EventRegistry<Ev> {
    fn clone(&self) -> Self {
        Self {
            cache: Rc::clone(&self.cache),
        }
    }
}

impl<Ev> Default for EventRegistry<Ev> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ev> EventRegistry<Ev> {
    /// Create an empty, unshared registry.
    pub fn new() -> Self {
        Self {
            cache: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Return the cached event for `name`, building it with `create` on first use.
    ///
    /// A failed construction is not cached.
    pub fn get_or_create<E>(
        &self,
        name: &str,
        create: impl FnOnce(&str) -> Result<Ev, E>,
    ) -> Result<Rc<Ev>, E> {
        if let Some(event) = self.cache.borrow().get(name) {
            return Ok(Rc::clone(event));
        }

        let event = Rc::new(create(name)?);
        self.cache
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&event));
        Ok(event)
    }

    /// Whether an event for `name` has been built.
    pub fn contains(&self, name: &str) -> bool {
        self.cache.borrow().contains_key(name)
    }

    /// Number of cached events.
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    /// Drop every cached event.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Whether both handles share the same table.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache)
    }
}

impl<Ev: 'static> EventRegistry<Ev> {
    /// The thread-wide registry for this event type.
    pub fn global() -> Self {
        GLOBAL_REGISTRIES.with(|registries| {
            let mut registries = registries.borrow_mut();
            let entry = registries
                .entry(TypeId::of::<Ev>())
                .or_insert_with(|| Box::new(EventRegistry::<Ev>::new()));
            match entry.downcast_ref::<EventRegistry<Ev>>() {
                Some(registry) => registry.clone(),
                None => EventRegistry::new(),
            }
        })
    }
}

/// Dispatch the event named `name` on `element`, reusing the memoized event object.
pub fn trigger<D: Dom>(
    dom: &D,
    registry: &EventRegistry<D::Event>,
    element: &D::Element,
    name: &str,
) {
    match registry.get_or_create(name, |name| dom.create_event(name)) {
        Ok(event) => {
            tracing::trace!("dispatching '{}' on {:?}", name, element);
            dom.dispatch_event(element, &event);
        }
        Err(err) => {
            tracing::warn!("trigger skipped: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memoizes_by_name() {
        let registry = EventRegistry::<String>::new();
        let mut builds = 0;

        let first = registry
            .get_or_create::<()>("open", |name| {
                builds += 1;
                Ok(name.to_string())
            })
            .unwrap();
        let second = registry
            .get_or_create::<()>("open", |_| panic!("must not rebuild"))
            .unwrap();

        assert_eq!(builds, 1);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failed_creation_is_not_cached() {
        let registry = EventRegistry::<String>::new();
        let result = registry.get_or_create("bad", |_| Err("nope"));
        assert_eq!(result.unwrap_err(), "nope");
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn test_clones_share_table() {
        let registry = EventRegistry::<u32>::new();
        let other = registry.clone();
        registry.get_or_create::<()>("a", |_| Ok(1)).unwrap();
        assert!(other.contains("a"));
        assert!(registry.ptr_eq(&other));

        other.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_global_is_shared_per_type() {
        struct Marker;
        let a = EventRegistry::<Marker>::global();
        let b = EventRegistry::<Marker>::global();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&EventRegistry::new()));
    }
}
