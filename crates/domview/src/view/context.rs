//! Read-only view access for methods.

use std::rc::Rc;

use super::selector::{Ui, UiTarget};
use crate::dom::Dom;
use crate::services::Services;

/// What a method sees of its view while it runs.
///
/// The context reflects the most recent render: the resolved root and UI map,
/// plus the services needed to dispatch named events.
pub struct ViewContext<'a, D: Dom> {
    name: &'a str,
    services: &'a Services<D>,
    root: Option<&'a D::Element>,
    ui: &'a Ui<D::Element>,
}

impl<'a, D: Dom> ViewContext<'a, D> {
    pub fn new(
        name: &'a str,
        services: &'a Services<D>,
        root: Option<&'a D::Element>,
        ui: &'a Ui<D::Element>,
    ) -> Self {
        Self {
            name,
            services,
            root,
            ui,
        }
    }

    /// Name of the view definition.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The resolved root element.
    pub fn el(&self) -> Option<&'a D::Element> {
        self.root
    }

    pub fn ui(&self) -> &'a Ui<D::Element> {
        self.ui
    }

    pub fn ui_element(&self, name: &str) -> Option<&'a UiTarget<D::Element>> {
        self.ui.get(name)
    }

    pub fn dom(&self) -> &'a D {
        self.services.dom()
    }

    /// Dispatch the event `name` (colons removed) on the root element.
    ///
    /// An event bound to a method of the same view is skipped while that
    /// view's state is borrowed by the running method.
    pub fn trigger(&self, name: &str) {
        trigger_on_root(self.services, self.root, self.name, name);
    }
}

/// Snapshot of the render results shared with bound callbacks.
pub(crate) struct Scope<E> {
    pub(crate) root: Option<E>,
    pub(crate) ui: Rc<Ui<E>>,
}

impl<E> Default for Scope<E> {
    fn default() -> Self {
        Self {
            root: None,
            ui: Rc::new(Ui::new()),
        }
    }
}

pub(crate) fn trigger_on_root<D: Dom>(
    services: &Services<D>,
    root: Option<&D::Element>,
    view: &str,
    name: &str,
) {
    let name: String = name.chars().filter(|ch| *ch != ':').collect();
    match root {
        Some(element) => services.trigger(element, &name),
        None => tracing::warn!("view '{}' has no root element to trigger '{}' on", view, name),
    }
}
