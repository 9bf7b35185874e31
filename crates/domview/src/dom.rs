//! Host DOM abstraction.
//!
//! Views and helpers talk to the document exclusively through [`Dom`], so the
//! same code drives the browser (`web::WebDom`) and the in-memory document
//! used by tests.

use std::fmt;
use std::rc::Rc;

/// Callback attached to an element for one event name.
pub type EventCallback<Ev> = Rc<dyn Fn(&Ev)>;

/// Errors reported by a [`Dom`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The selector could not be parsed by the host.
    InvalidSelector {
        /// The offending selector.
        selector: String,
        /// Host supplied description.
        message: String,
    },

    /// The host refused to construct an event object.
    InvalidEvent {
        /// The event name.
        name: String,
        /// Host supplied description.
        message: String,
    },

    /// Attaching a listener failed.
    Listener {
        /// The event name.
        event: String,
        /// Host supplied description.
        message: String,
    },

    /// No document (or window) is available.
    NoDocument,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::InvalidSelector { selector, message } => {
                write!(f, "Invalid selector '{}': {}", selector, message)
            }
            DomError::InvalidEvent { name, message } => {
                write!(f, "Cannot create event '{}': {}", name, message)
            }
            DomError::Listener { event, message } => {
                write!(f, "Cannot listen for '{}': {}", event, message)
            }
            DomError::NoDocument => write!(f, "No document available"),
        }
    }
}

impl std::error::Error for DomError {}

/// Result type alias for DOM operations.
pub type DomResult<T> = Result<T, DomError>;

/// The subset of the DOM contract consumed by this crate.
///
/// Element handles are cheap to clone and compare by node identity.
pub trait Dom {
    /// Handle to an element node.
    type Element: Clone + PartialEq + fmt::Debug + 'static;
    /// Event object passed to [`Dom::dispatch_event`] and to listeners.
    type Event: 'static;
    /// Opaque token returned when a listener is attached, needed to detach it.
    type Listener: 'static;

    /// The root element of the document (`<html>`).
    fn document_element(&self) -> Option<Self::Element>;

    /// First descendant of `scope` matching `selector`.
    fn query_selector(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> DomResult<Option<Self::Element>>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_selector_all(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> DomResult<Vec<Self::Element>>;

    /// Construct a plain event named `name`.
    fn create_event(&self, name: &str) -> DomResult<Self::Event>;

    /// Dispatch `event` on `target`.
    fn dispatch_event(&self, target: &Self::Element, event: &Self::Event);

    /// Attach `callback` for `event` on `target`.
    fn add_event_listener(
        &self,
        target: &Self::Element,
        event: &str,
        callback: EventCallback<Self::Event>,
    ) -> DomResult<Self::Listener>;

    /// Detach a listener previously returned by [`Dom::add_event_listener`].
    fn remove_event_listener(&self, target: &Self::Element, event: &str, listener: &Self::Listener);

    /// Set an inline style property. `property` is a CSS property name.
    fn set_style_property(&self, target: &Self::Element, property: &str, value: &str);

    /// Remove an inline style property.
    fn remove_style_property(&self, target: &Self::Element, property: &str);

    /// Read an attribute.
    fn attribute(&self, target: &Self::Element, name: &str) -> Option<String>;

    /// Remove an attribute.
    fn remove_attribute(&self, target: &Self::Element, name: &str);

    /// Detach `target` from the tree.
    fn remove(&self, target: &Self::Element);

    /// All elements in the document matching `selector`.
    fn select_all(&self, selector: &str) -> DomResult<Vec<Self::Element>> {
        match self.document_element() {
            Some(root) => self.query_selector_all(&root, selector),
            None => Err(DomError::NoDocument),
        }
    }
}
