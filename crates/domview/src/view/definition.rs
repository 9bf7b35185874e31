use std::rc::Rc;

use indexmap::IndexMap;

use super::context::ViewContext;
use super::selector::{SelectorMap, Ui, UiSelector};
use crate::dom::Dom;
use crate::resize::ResizeEvent;

/// Event handler: receives the view state, a read-only view of the rendered
/// view and the dispatched event.
pub type Method<D, S> = Rc<dyn Fn(&mut S, &ViewContext<'_, D>, &<D as Dom>::Event)>;
/// Called once per render, after the UI map is resolved.
pub type InitHook<S, E> = Rc<dyn Fn(&mut S, &Ui<E>)>;
/// Called for every window resize while the view is rendered.
pub type ResizeHook<S> = Rc<dyn Fn(&mut S, &ResizeEvent)>;
/// Called first thing in `destroy`.
pub type DestroyHook<S> = Rc<dyn Fn(&mut S)>;

/// Event key to method name.
pub type EventMap = IndexMap<String, String>;

/// Merge two layers of a keyed map. Keys keep the position of their first
/// appearance; values from `overrides` win.
pub fn merge_layers<V: Clone>(
    defaults: &IndexMap<String, V>,
    overrides: &IndexMap<String, V>,
) -> IndexMap<String, V> {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// The shared description of a kind of view: default UI and event maps plus
/// the methods and hooks instances run.
pub struct ViewDefinition<D: Dom, S> {
    name: String,
    ui: SelectorMap<D::Element>,
    events: EventMap,
    methods: IndexMap<String, Method<D, S>>,
    init: Option<InitHook<S, D::Element>>,
    on_resize: Option<ResizeHook<S>>,
    before_destroy: Option<DestroyHook<S>>,
}

impl<D: Dom, S> ViewDefinition<D, S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ui: SelectorMap::new(),
            events: EventMap::new(),
            methods: IndexMap::new(),
            init: None,
            on_resize: None,
            before_destroy: None,
        }
    }

    /// Add a default UI entry.
    pub fn ui(mut self, name: impl Into<String>, selector: impl Into<UiSelector<D::Element>>) -> Self {
        self.ui.insert(name.into(), selector.into());
        self
    }

    /// Add a default event binding, e.g. `.event("click: @ui.button", "on_click")`.
    pub fn event(mut self, key: impl Into<String>, method: impl Into<String>) -> Self {
        self.events.insert(key.into(), method.into());
        self
    }

    /// Register a named method that event bindings can refer to.
    pub fn method(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut S, &ViewContext<'_, D>, &D::Event) + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(handler));
        self
    }

    pub fn on_init(mut self, hook: impl Fn(&mut S, &Ui<D::Element>) + 'static) -> Self {
        self.init = Some(Rc::new(hook));
        self
    }

    pub fn on_resize(mut self, hook: impl Fn(&mut S, &ResizeEvent) + 'static) -> Self {
        self.on_resize = Some(Rc::new(hook));
        self
    }

    pub fn before_destroy(mut self, hook: impl Fn(&mut S) + 'static) -> Self {
        self.before_destroy = Some(Rc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ui_map(&self) -> &SelectorMap<D::Element> {
        &self.ui
    }

    pub fn event_map(&self) -> &EventMap {
        &self.events
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub(crate) fn method_handler(&self, name: &str) -> Option<Method<D, S>> {
        self.methods.get(name).cloned()
    }

    pub(crate) fn init_hook(&self) -> Option<InitHook<S, D::Element>> {
        self.init.clone()
    }

    pub(crate) fn resize_hook(&self) -> Option<ResizeHook<S>> {
        self.on_resize.clone()
    }

    pub(crate) fn destroy_hook(&self) -> Option<DestroyHook<S>> {
        self.before_destroy.clone()
    }
}

/// Root element designation.
#[derive(Debug, Clone, PartialEq)]
pub enum RootSpec<E> {
    /// Resolved against the document on render; first match wins.
    Selector(String),
    Element(E),
}

/// Per-instance configuration layered over a [`ViewDefinition`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig<E> {
    pub el: Option<RootSpec<E>>,
    pub ui: SelectorMap<E>,
    pub events: EventMap,
}

impl<E> Default for ViewConfig<E> {
    fn default() -> Self {
        Self {
            el: None,
            ui: SelectorMap::new(),
            events: EventMap::new(),
        }
    }
}

impl<E> ViewConfig<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn el(mut self, root: RootSpec<E>) -> Self {
        self.el = Some(root);
        self
    }

    pub fn el_selector(self, selector: impl Into<String>) -> Self {
        self.el(RootSpec::Selector(selector.into()))
    }

    pub fn el_element(self, element: E) -> Self {
        self.el(RootSpec::Element(element))
    }

    pub fn ui(mut self, name: impl Into<String>, selector: impl Into<UiSelector<E>>) -> Self {
        self.ui.insert(name.into(), selector.into());
        self
    }

    pub fn event(mut self, key: impl Into<String>, method: impl Into<String>) -> Self {
        self.events.insert(key.into(), method.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_merge_overrides_win() {
        let merged = merge_layers(&map(&[("a", "1"), ("b", "2")]), &map(&[("b", "3")]));
        assert_eq!(merged, map(&[("a", "1"), ("b", "3")]));
    }

    #[test]
    fn test_merge_keeps_first_position() {
        let merged = merge_layers(&map(&[("a", "1"), ("b", "2")]), &map(&[("c", "0"), ("a", "9")]));
        let keys: Vec<_> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(merged["a"], "9");
    }

    #[test]
    fn test_merge_empty_layers() {
        let empty = IndexMap::<String, String>::new();
        assert!(merge_layers(&empty, &empty).is_empty());
        assert_eq!(merge_layers(&map(&[("a", "1")]), &empty), map(&[("a", "1")]));
    }
}
