//! Shared context handed to every view.

use crate::dom::Dom;
use crate::events::{self, EventRegistry};
use crate::resize::ResizeBroadcaster;

/// The host document plus the process-wide event table and resize broadcaster.
pub struct Services<D: Dom> {
    dom: D,
    events: EventRegistry<D::Event>,
    resize: ResizeBroadcaster,
}

impl<D: Dom + Clone> Clone for Services<D> {
    fn clone(&self) -> Self {
        Self {
            dom: self.dom.clone(),
            events: self.events.clone(),
            resize: self.resize.clone(),
        }
    }
}

impl<D: Dom> Services<D> {
    /// Use the thread-wide event registry and resize broadcaster.
    pub fn new(dom: D) -> Self {
        Self {
            dom,
            events: EventRegistry::global(),
            resize: ResizeBroadcaster::global(),
        }
    }

    /// Use a private event registry and resize broadcaster.
    pub fn isolated(dom: D) -> Self {
        Self {
            dom,
            events: EventRegistry::new(),
            resize: ResizeBroadcaster::new(),
        }
    }

    pub fn with_resize(mut self, resize: ResizeBroadcaster) -> Self {
        self.resize = resize;
        self
    }

    pub fn with_events(mut self, events: EventRegistry<D::Event>) -> Self {
        self.events = events;
        self
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn events(&self) -> &EventRegistry<D::Event> {
        &self.events
    }

    pub fn resize(&self) -> &ResizeBroadcaster {
        &self.resize
    }

    /// Dispatch the event named `name` on `element`.
    pub fn trigger(&self, element: &D::Element, name: &str) {
        events::trigger(&self.dom, &self.events, element, name);
    }
}
