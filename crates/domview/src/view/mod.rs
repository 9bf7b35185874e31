//! Declarative views.
//!
//! A [`View`] owns a root element, a map of named UI elements resolved from
//! selectors, and a set of event listeners declared as
//! `"event[:] [@ui.name]" -> method` pairs. Defaults come from a shared
//! [`ViewDefinition`]; a [`ViewConfig`] overrides them per instance.
//!
//! # Example
//!
//! ```ignore
//! let definition = Rc::new(
//!     ViewDefinition::new("menu")
//!         .ui("button", "#toggle")
//!         .event("click: @ui.button", "toggle")
//!         .method("toggle", |state: &mut MenuState, view, _event| {
//!             state.open = !state.open;
//!             view.trigger(if state.open { "opened" } else { "closed" });
//!         }),
//! );
//!
//! let mut view = View::new(services, definition, ViewConfig::new().el_selector("#menu"), MenuState::default());
//! view.render();
//! ```

mod binding;
mod context;
mod definition;
mod selector;

pub use binding::{BindTarget, EventKey, ListenerBinding, ListenerRegistry};
pub use definition::{
    DestroyHook, EventMap, InitHook, Method, ResizeHook, RootSpec, ViewConfig, ViewDefinition,
    merge_layers,
};
pub use context::ViewContext;
pub use selector::{SelectorMap, SelectorMode, Ui, UiSelector, UiTarget};

use context::{Scope, trigger_on_root};

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::dom::{Dom, EventCallback};
use crate::resize::{ResizeEvent, SubscriberId};
use crate::services::Services;

/// Parse an event-map key, warning when it names no event.
pub fn parse_event_key(key: &str) -> Option<EventKey> {
    let parsed = EventKey::parse(key);
    if parsed.is_none() {
        tracing::warn!("ignoring event key '{}' without an event name", key);
    }
    parsed
}

#[derive(Debug, Clone, PartialEq)]
enum Root<E> {
    Unset,
    Selector(String),
    Element(E),
    /// A selector that matched nothing.
    Missing(String),
}

/// A live view instance.
pub struct View<D: Dom + 'static, S: 'static> {
    services: Rc<Services<D>>,
    definition: Rc<ViewDefinition<D, S>>,
    config: ViewConfig<D::Element>,
    root: Root<D::Element>,
    ui_selectors: SelectorMap<D::Element>,
    ui: Rc<Ui<D::Element>>,
    scope: Rc<RefCell<Scope<D::Element>>>,
    events_selectors: EventMap,
    listeners: ListenerRegistry<D::Element, D::Listener>,
    bound: IndexMap<String, EventCallback<D::Event>>,
    state: Rc<RefCell<S>>,
    resize_subscription: Option<SubscriberId>,
    destroyed: bool,
}

impl<D: Dom + 'static, S: 'static> View<D, S> {
    /// Create a view. Nothing touches the document until [`View::render`].
    pub fn new(
        services: Services<D>,
        definition: Rc<ViewDefinition<D, S>>,
        config: ViewConfig<D::Element>,
        state: S,
    ) -> Self {
        let root = match &config.el {
            None => Root::Unset,
            Some(RootSpec::Selector(selector)) => Root::Selector(selector.clone()),
            Some(RootSpec::Element(element)) => Root::Element(element.clone()),
        };

        Self {
            services: Rc::new(services),
            definition,
            config,
            root,
            ui_selectors: SelectorMap::new(),
            ui: Rc::new(Ui::new()),
            scope: Rc::new(RefCell::new(Scope::default())),
            events_selectors: EventMap::new(),
            listeners: ListenerRegistry::new(),
            bound: IndexMap::new(),
            state: Rc::new(RefCell::new(state)),
            resize_subscription: None,
            destroyed: false,
        }
    }

    /// Resolve the root and UI map, run the init hook, bind events and
    /// subscribe to resizes. Rendering again rebinds from scratch.
    pub fn render(&mut self) {
        if self.destroyed {
            tracing::warn!("render called on destroyed view '{}'", self.definition.name());
            return;
        }
        tracing::debug!("rendering view '{}'", self.definition.name());

        self.resolve_root();
        self.init_ui();

        if let Some(init) = self.definition.init_hook() {
            match self.state.try_borrow_mut() {
                Ok(mut state) => init(&mut state, &*self.ui),
                Err(_) => tracing::warn!(
                    "view '{}' state is busy, init skipped",
                    self.definition.name()
                ),
            }
        }

        self.events_selectors = merge_layers(self.definition.event_map(), &self.config.events);
        self.bind_events();
        self.subscribe_resize();
    }

    /// Attach a listener for every entry of the event map, dropping any
    /// listeners attached before.
    pub fn bind_events(&mut self) {
        self.unbind_events();

        let entries: Vec<(String, String)> = self
            .events_selectors
            .iter()
            .map(|(key, method)| (key.clone(), method.clone()))
            .collect();

        for (key, method) in entries {
            let Some(parsed) = parse_event_key(&key) else {
                continue;
            };
            let Some(callback) = self.bind_method(&method) else {
                tracing::warn!(
                    "view '{}' has no method '{}' for event '{}'",
                    self.definition.name(),
                    method,
                    key
                );
                continue;
            };

            for element in self.binding_targets(&parsed.target) {
                match self
                    .services
                    .dom()
                    .add_event_listener(&element, &parsed.event, Rc::clone(&callback))
                {
                    Ok(listener) => self.listeners.record(element, parsed.event.clone(), listener),
                    Err(err) => tracing::warn!("failed to bind '{}': {}", key, err),
                }
            }
        }
    }

    /// Detach every listener attached by [`View::bind_events`]. Calling it
    /// twice is harmless.
    pub fn unbind_events(&mut self) {
        let dom = self.services.dom();
        for (element, bindings) in self.listeners.drain() {
            for binding in bindings {
                dom.remove_event_listener(&element, &binding.event, &binding.listener);
            }
        }
    }

    /// Resolve a selector relative to the root element.
    ///
    /// A selector ending in `[0]` or starting with `#` yields at most one
    /// element; any other selector yields every match. Without a root the
    /// lookup is refused with a warning.
    pub fn get_element_by_selector(
        &self,
        selector: impl Into<UiSelector<D::Element>>,
    ) -> UiTarget<D::Element> {
        let selector = selector.into();

        if matches!(self.root, Root::Unset) {
            tracing::warn!(
                "view '{}' has no root element, cannot resolve {:?}",
                self.definition.name(),
                selector
            );
            return UiTarget::Missing;
        }

        let selector = match selector {
            UiSelector::Element(element) => return UiTarget::One(element),
            UiSelector::Selector(selector) => selector,
        };

        let dom = self.services.dom();
        let base = match &self.root {
            Root::Element(element) => element.clone(),
            _ => match dom.document_element() {
                Some(document) => document,
                None => {
                    tracing::warn!("no document to resolve '{}' against", selector);
                    return UiTarget::Missing;
                }
            },
        };

        match SelectorMode::classify(&selector) {
            SelectorMode::First(query) => match dom.query_selector(&base, query) {
                Ok(Some(element)) => UiTarget::One(element),
                Ok(None) => UiTarget::Missing,
                Err(err) => {
                    tracing::warn!("{}", err);
                    UiTarget::Missing
                }
            },
            SelectorMode::All(query) => match dom.query_selector_all(&base, query) {
                Ok(elements) => UiTarget::Many(elements),
                Err(err) => {
                    tracing::warn!("{}", err);
                    UiTarget::Many(Vec::new())
                }
            },
        }
    }

    /// Dispatch the event `name` (colons removed) on the root element.
    pub fn trigger(&self, name: &str) {
        trigger_on_root(&*self.services, self.el(), self.definition.name(), name);
    }

    /// Produce callbacks for the named methods, bound to this view's state.
    /// Retrieve them with [`View::bound`].
    pub fn bind(&mut self, names: &[&str]) {
        for name in names {
            match self.bind_method(name) {
                Some(callback) => {
                    self.bound.insert(name.to_string(), callback);
                }
                None => tracing::warn!(
                    "view '{}' has no method '{}' to bind",
                    self.definition.name(),
                    name
                ),
            }
        }
    }

    pub fn bound(&self, name: &str) -> Option<EventCallback<D::Event>> {
        self.bound.get(name).cloned()
    }

    /// Run the resize hook directly.
    pub fn on_resize(&self, event: &ResizeEvent) {
        if let Some(hook) = self.definition.resize_hook() {
            run_resize_hook(&hook, &Rc::downgrade(&self.state), event);
        }
    }

    /// Tear the view down: run `before_destroy`, detach listeners, leave the
    /// resize broadcaster and remove the root from the document.
    pub fn destroy(&mut self) {
        if self.destroyed {
            tracing::debug!("view '{}' already destroyed", self.definition.name());
            return;
        }

        if let Some(hook) = self.definition.destroy_hook() {
            match self.state.try_borrow_mut() {
                Ok(mut state) => hook(&mut state),
                Err(_) => tracing::warn!(
                    "view '{}' state is busy, before_destroy skipped",
                    self.definition.name()
                ),
            }
        }

        self.unbind_events();

        if let Some(id) = self.resize_subscription.take() {
            self.services.resize().remove(id);
        }

        match &self.root {
            Root::Element(element) => self.services.dom().remove(element),
            _ => tracing::warn!("view '{}' has no root element to remove", self.definition.name()),
        }

        self.destroyed = true;
        tracing::debug!("destroyed view '{}'", self.definition.name());
    }

    /// The resolved root element.
    pub fn el(&self) -> Option<&D::Element> {
        match &self.root {
            Root::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn ui(&self) -> &Ui<D::Element> {
        &self.ui
    }

    /// Resolved UI entry `name`.
    pub fn ui_element(&self, name: &str) -> Option<&UiTarget<D::Element>> {
        self.ui.get(name)
    }

    pub fn ui_selectors(&self) -> &SelectorMap<D::Element> {
        &self.ui_selectors
    }

    pub fn events_selectors(&self) -> &EventMap {
        &self.events_selectors
    }

    pub fn listeners(&self) -> &ListenerRegistry<D::Element, D::Listener> {
        &self.listeners
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_rendered(&self) -> bool {
        self.resize_subscription.is_some()
    }

    pub fn state(&self) -> Ref<'_, S> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, S> {
        self.state.borrow_mut()
    }

    pub fn services(&self) -> &Services<D> {
        &self.services
    }

    pub fn definition(&self) -> &ViewDefinition<D, S> {
        &self.definition
    }

    fn resolve_root(&mut self) {
        let selector = match &self.root {
            Root::Selector(selector) | Root::Missing(selector) => selector.clone(),
            Root::Unset | Root::Element(_) => return,
        };

        let dom = self.services.dom();
        let found = match dom.document_element() {
            Some(document) => match dom.query_selector(&document, &selector) {
                Ok(found) => found,
                Err(err) => {
                    tracing::warn!("{}", err);
                    None
                }
            },
            None => None,
        };

        self.root = match found {
            Some(element) => Root::Element(element),
            None => {
                tracing::warn!(
                    "root '{}' of view '{}' not found",
                    selector,
                    self.definition.name()
                );
                Root::Missing(selector)
            }
        };
    }

    fn init_ui(&mut self) {
        self.ui_selectors = merge_layers(self.definition.ui_map(), &self.config.ui);
        let resolved: Ui<D::Element> = self
            .ui_selectors
            .iter()
            .map(|(name, selector)| (name.clone(), self.get_element_by_selector(selector.clone())))
            .collect();
        self.ui = Rc::new(resolved);

        let mut scope = self.scope.borrow_mut();
        scope.root = self.el().cloned();
        scope.ui = Rc::clone(&self.ui);
    }

    fn binding_targets(&self, target: &BindTarget) -> Vec<D::Element> {
        match target {
            BindTarget::Root => self.el().cloned().into_iter().collect(),
            BindTarget::Ui(name) => match self.ui.get(name) {
                Some(target) => target.to_vec(),
                None => {
                    tracing::debug!("ui '{}' is not declared, binding skipped", name);
                    Vec::new()
                }
            },
        }
    }

    fn bind_method(&self, name: &str) -> Option<EventCallback<D::Event>> {
        let method = self.definition.method_handler(name)?;
        let state = Rc::downgrade(&self.state);
        let scope = Rc::downgrade(&self.scope);
        let services = Rc::downgrade(&self.services);
        let view = self.definition.name().to_string();
        let name = name.to_string();

        let callback: EventCallback<D::Event> = Rc::new(move |event: &D::Event| {
            let (Some(state), Some(scope), Some(services)) =
                (state.upgrade(), scope.upgrade(), services.upgrade())
            else {
                return;
            };
            let (root, ui) = {
                let scope = scope.borrow();
                (scope.root.clone(), Rc::clone(&scope.ui))
            };
            let context = ViewContext::new(view.as_str(), &*services, root.as_ref(), &*ui);
            match state.try_borrow_mut() {
                Ok(mut state) => method(&mut *state, &context, event),
                Err(_) => tracing::warn!("skipping re-entrant call to '{}'", name),
            };
        });
        Some(callback)
    }

    fn subscribe_resize(&mut self) {
        let resize = self.services.resize().clone();
        if let Some(id) = self.resize_subscription.take() {
            resize.remove(id);
        }

        let hook = self.definition.resize_hook();
        let state = Rc::downgrade(&self.state);
        let id = resize.add(move |event| {
            if let Some(hook) = &hook {
                run_resize_hook(hook, &state, event);
            }
        });
        self.resize_subscription = Some(id);
    }
}

impl<D: Dom + 'static, S: 'static> Drop for View<D, S> {
    fn drop(&mut self) {
        self.unbind_events();
        if let Some(id) = self.resize_subscription.take() {
            self.services.resize().remove(id);
        }
    }
}

fn run_resize_hook<S>(hook: &ResizeHook<S>, state: &Weak<RefCell<S>>, event: &ResizeEvent) {
    let Some(state) = state.upgrade() else {
        return;
    };
    match state.try_borrow_mut() {
        Ok(mut state) => hook(&mut state, event),
        Err(_) => tracing::warn!("view state is busy, resize skipped"),
    };
}
