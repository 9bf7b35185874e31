use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CssStyleDeclaration, Document, Element, Event, HtmlElement, SvgElement};

use super::js_message;
use crate::dom::{Dom, DomError, DomResult, EventCallback};

/// [`Dom`] over the live browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

/// Keeps the JS closure of an attached listener alive.
pub struct WebListener {
    closure: Closure<dyn Fn(Event)>,
}

impl WebDom {
    /// The document of the current window.
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        Some(html.style())
    } else {
        element.dyn_ref::<SvgElement>().map(|svg| svg.style())
    }
}

impl Dom for WebDom {
    type Element = Element;
    type Event = Event;
    type Listener = WebListener;

    fn document_element(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn query_selector(&self, scope: &Element, selector: &str) -> DomResult<Option<Element>> {
        scope
            .query_selector(selector)
            .map_err(|err| DomError::InvalidSelector {
                selector: selector.to_string(),
                message: js_message(&err),
            })
    }

    fn query_selector_all(&self, scope: &Element, selector: &str) -> DomResult<Vec<Element>> {
        let list = scope
            .query_selector_all(selector)
            .map_err(|err| DomError::InvalidSelector {
                selector: selector.to_string(),
                message: js_message(&err),
            })?;

        Ok((0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn create_event(&self, name: &str) -> DomResult<Event> {
        Event::new(name).map_err(|err| DomError::InvalidEvent {
            name: name.to_string(),
            message: js_message(&err),
        })
    }

    fn dispatch_event(&self, target: &Element, event: &Event) {
        if let Err(err) = target.dispatch_event(event) {
            tracing::warn!("dispatch of '{}' failed: {}", event.type_(), js_message(&err));
        }
    }

    fn add_event_listener(
        &self,
        target: &Element,
        event: &str,
        callback: EventCallback<Event>,
    ) -> DomResult<WebListener> {
        let closure = Closure::wrap(Box::new(move |ev: Event| callback(&ev)) as Box<dyn Fn(Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|err| DomError::Listener {
                event: event.to_string(),
                message: js_message(&err),
            })?;
        Ok(WebListener { closure })
    }

    fn remove_event_listener(&self, target: &Element, event: &str, listener: &WebListener) {
        if let Err(err) = target
            .remove_event_listener_with_callback(event, listener.closure.as_ref().unchecked_ref())
        {
            tracing::debug!("removing '{}' listener failed: {}", event, js_message(&err));
        }
    }

    fn set_style_property(&self, target: &Element, property: &str, value: &str) {
        match style_of(target) {
            Some(style) => {
                if let Err(err) = style.set_property(property, value) {
                    tracing::warn!("css: cannot set '{}': {}", property, js_message(&err));
                }
            }
            None => tracing::warn!("css: {:?} has no inline style", target.tag_name()),
        }
    }

    fn remove_style_property(&self, target: &Element, property: &str) {
        if let Some(style) = style_of(target) {
            if let Err(err) = style.remove_property(property) {
                tracing::warn!("css: cannot remove '{}': {}", property, js_message(&err));
            }
        }
    }

    fn attribute(&self, target: &Element, name: &str) -> Option<String> {
        target.get_attribute(name)
    }

    fn remove_attribute(&self, target: &Element, name: &str) {
        if let Err(err) = target.remove_attribute(name) {
            tracing::debug!("removing attribute '{}' failed: {}", name, js_message(&err));
        }
    }

    fn remove(&self, target: &Element) {
        target.remove();
    }
}
