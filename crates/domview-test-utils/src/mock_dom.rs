//! In-memory document implementing [`Dom`].
//!
//! The element tree is a `scraper` document, so selector queries use a real
//! CSS engine. Elements are addressed by [`MockElement`] handles. Every trait
//! call is recorded as a [`DomCall`] so tests can verify what a view or helper
//! did to the document.

use std::rc::Rc;

use domview::dom::{Dom, DomError, DomResult, EventCallback};
use ego_tree::NodeId;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use indexmap::IndexMap;
use parking_lot::Mutex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Handle to a node of a [`MockDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockElement(usize);

impl MockElement {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Event object created by [`MockDom`]. Each creation gets a new serial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockEvent {
    name: String,
    serial: u64,
}

impl MockEvent {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }
}

/// Listener token returned by [`MockDom::add_event_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockListener(u64);

/// Records a DOM call for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomCall {
    QuerySelector {
        scope: MockElement,
        selector: String,
    },
    QuerySelectorAll {
        scope: MockElement,
        selector: String,
    },
    CreateEvent {
        name: String,
    },
    DispatchEvent {
        target: MockElement,
        name: String,
        serial: u64,
    },
    AddListener {
        target: MockElement,
        event: String,
    },
    RemoveListener {
        target: MockElement,
        event: String,
    },
    SetStyle {
        target: MockElement,
        property: String,
        value: String,
    },
    RemoveStyle {
        target: MockElement,
        property: String,
    },
    RemoveAttribute {
        target: MockElement,
        name: String,
    },
    Remove {
        target: MockElement,
    },
}

struct RegisteredListener {
    id: u64,
    event: String,
    callback: EventCallback<MockEvent>,
}

struct MockNode {
    id: NodeId,
    tag: String,
    attributes: IndexMap<String, String>,
    style: IndexMap<String, String>,
    has_style_attribute: bool,
    listeners: Vec<RegisteredListener>,
}

impl MockNode {
    fn style_text(&self) -> String {
        self.style
            .iter()
            .map(|(property, value)| format!("{}: {};", property, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Node bookkeeping kept next to the `scraper` tree, which owns the
/// structure and answers selector queries.
struct MockDomState {
    document: Html,
    nodes: Vec<MockNode>,
    next_listener: u64,
    next_event: u64,
}

impl MockDomState {
    fn new() -> Self {
        let mut document = Html::new_document();
        let html = document
            .tree
            .root_mut()
            .append(element_node("html", &IndexMap::new()))
            .id();

        let mut state = Self {
            document,
            nodes: vec![MockNode {
                id: html,
                tag: "html".to_string(),
                attributes: IndexMap::new(),
                style: IndexMap::new(),
                has_style_attribute: false,
                listeners: Vec::new(),
            }],
            next_listener: 0,
            next_event: 0,
        };
        state.append(0, "body", IndexMap::new());
        state
    }

    fn append(&mut self, parent: usize, tag: &str, attributes: IndexMap<String, String>) -> usize {
        let tag = tag.to_ascii_lowercase();
        let value = element_node(&tag, &attributes);
        let tree = &mut self.document.tree;
        let id = match tree.get_mut(self.nodes[parent].id) {
            Some(mut parent) => parent.append(value).id(),
            None => tree.orphan(value).id(),
        };

        self.nodes.push(MockNode {
            id,
            tag,
            attributes,
            style: IndexMap::new(),
            has_style_attribute: false,
            listeners: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Push the attributes of `index` into the tree so selectors see them.
    fn sync_attributes(&mut self, index: usize) {
        let node = &self.nodes[index];
        let value = element_node(&node.tag, &node.attributes);
        if let Some(mut tree_node) = self.document.tree.get_mut(node.id) {
            *tree_node.value() = value;
        }
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    fn parent(&self, index: usize) -> Option<usize> {
        let parent = self.document.tree.get(self.nodes[index].id)?.parent()?;
        self.index_of(parent.id())
    }

    fn is_attached(&self, index: usize) -> bool {
        let html = self.nodes[0].id;
        index == 0
            || self
                .document
                .tree
                .get(self.nodes[index].id)
                .is_some_and(|node| node.ancestors().any(|ancestor| ancestor.id() == html))
    }

    fn detach(&mut self, index: usize) {
        if let Some(mut node) = self.document.tree.get_mut(self.nodes[index].id) {
            node.detach();
        }
    }

    /// Descendants of `scope` matching `selector`, in document order.
    fn select(&self, scope: usize, selector: &Selector) -> Vec<MockElement> {
        let Some(scope) = self
            .document
            .tree
            .get(self.nodes[scope].id)
            .and_then(ElementRef::wrap)
        else {
            return Vec::new();
        };

        scope
            .select(selector)
            .filter_map(|element| self.index_of((*element).id()))
            .map(MockElement)
            .collect()
    }
}

/// In-memory document for testing.
///
/// A new document holds `<html>` with an empty `<body>`. Clones share the
/// same tree and call log.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "mock")]
/// # {
/// use domview::Dom;
/// use domview_test_utils::MockDom;
///
/// let dom = MockDom::new();
/// let app = dom.append(&dom.body(), "div#app");
/// dom.append(&app, "button.primary");
///
/// let root = dom.document_element().unwrap();
/// assert_eq!(dom.query_selector(&root, "#app").unwrap(), Some(app));
/// assert_eq!(dom.query_selector_all(&app, ".primary").unwrap().len(), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct MockDom {
    state: Rc<Mutex<MockDomState>>,
    calls: Rc<Mutex<Vec<DomCall>>>,
}

impl MockDom {
    pub fn new() -> Self {
        Self {
            state: Rc::new(Mutex::new(MockDomState::new())),
            calls: Rc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn document(&self) -> MockElement {
        MockElement(0)
    }

    pub fn body(&self) -> MockElement {
        MockElement(1)
    }

    /// Append a child described as `tag#id.class.class` and return it.
    pub fn append(&self, parent: &MockElement, descriptor: &str) -> MockElement {
        let (tag, id, classes) = parse_element_descriptor(descriptor);
        let mut attributes = IndexMap::new();
        if let Some(id) = id {
            attributes.insert("id".to_string(), id.to_string());
        }
        if !classes.is_empty() {
            attributes.insert("class".to_string(), classes.join(" "));
        }

        MockElement(self.state.lock().append(parent.0, tag, attributes))
    }

    pub fn set_attribute(&self, element: &MockElement, name: &str, value: &str) {
        let mut state = self.state.lock();
        let node = &mut state.nodes[element.0];
        if name == "style" {
            node.has_style_attribute = true;
            node.style = parse_style_text(value);
        } else {
            node.attributes.insert(name.to_ascii_lowercase(), value.to_string());
            state.sync_attributes(element.0);
        }
    }

    pub fn tag(&self, element: &MockElement) -> String {
        self.state.lock().nodes[element.0].tag.clone()
    }

    pub fn parent(&self, element: &MockElement) -> Option<MockElement> {
        self.state.lock().parent(element.0).map(MockElement)
    }

    /// Inline style value of `property`.
    pub fn style(&self, element: &MockElement, property: &str) -> Option<String> {
        self.state.lock().nodes[element.0].style.get(property).cloned()
    }

    /// Whether `element` is still connected to the document.
    pub fn is_attached(&self, element: &MockElement) -> bool {
        self.state.lock().is_attached(element.0)
    }

    pub fn listener_count(&self, element: &MockElement, event: &str) -> usize {
        self.state.lock().nodes[element.0]
            .listeners
            .iter()
            .filter(|listener| listener.event == event)
            .count()
    }

    pub fn total_listeners(&self) -> usize {
        self.state
            .lock()
            .nodes
            .iter()
            .map(|node| node.listeners.len())
            .sum()
    }

    /// Dispatch a freshly created event, as if the user interacted with `element`.
    /// The creation is not recorded.
    pub fn fire(&self, element: &MockElement, name: &str) {
        let event = self.new_event(name);
        self.invoke_listeners(element, &event);
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<DomCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn count_event_creates(&self) -> usize {
        self.count(|call| matches!(call, DomCall::CreateEvent { .. }))
    }

    pub fn count_dispatches(&self, name: &str) -> usize {
        self.count(|call| matches!(call, DomCall::DispatchEvent { name: n, .. } if n == name))
    }

    pub fn count_style_writes(&self) -> usize {
        self.count(|call| matches!(call, DomCall::SetStyle { .. }))
    }

    /// Serials of the events dispatched under `name`, in order.
    pub fn dispatched_serials(&self, name: &str) -> Vec<u64> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DomCall::DispatchEvent { name: n, serial, .. } if n == name => Some(*serial),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&DomCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: DomCall) {
        self.calls.lock().push(call);
    }

    fn new_event(&self, name: &str) -> MockEvent {
        let mut state = self.state.lock();
        state.next_event += 1;
        MockEvent {
            name: name.to_string(),
            serial: state.next_event,
        }
    }

    fn invoke_listeners(&self, element: &MockElement, event: &MockEvent) {
        // Callbacks may call back into the document, so release the lock first.
        let callbacks: Vec<EventCallback<MockEvent>> = self.state.lock().nodes[element.0]
            .listeners
            .iter()
            .filter(|listener| listener.event == event.name)
            .map(|listener| Rc::clone(&listener.callback))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }

    fn parse(&self, selector: &str) -> DomResult<Selector> {
        Selector::parse(selector).map_err(|err| DomError::InvalidSelector {
            selector: selector.to_string(),
            message: err.to_string(),
        })
    }
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MockDom {
    type Element = MockElement;
    type Event = MockEvent;
    type Listener = MockListener;

    fn document_element(&self) -> Option<MockElement> {
        Some(self.document())
    }

    fn query_selector(&self, scope: &MockElement, selector: &str) -> DomResult<Option<MockElement>> {
        self.record(DomCall::QuerySelector {
            scope: *scope,
            selector: selector.to_string(),
        });
        let selector = self.parse(selector)?;
        Ok(self.state.lock().select(scope.0, &selector).into_iter().next())
    }

    fn query_selector_all(&self, scope: &MockElement, selector: &str) -> DomResult<Vec<MockElement>> {
        self.record(DomCall::QuerySelectorAll {
            scope: *scope,
            selector: selector.to_string(),
        });
        let selector = self.parse(selector)?;
        Ok(self.state.lock().select(scope.0, &selector))
    }

    fn create_event(&self, name: &str) -> DomResult<MockEvent> {
        self.record(DomCall::CreateEvent {
            name: name.to_string(),
        });
        if name.is_empty() {
            return Err(DomError::InvalidEvent {
                name: String::new(),
                message: "event name is empty".to_string(),
            });
        }
        Ok(self.new_event(name))
    }

    fn dispatch_event(&self, target: &MockElement, event: &MockEvent) {
        self.record(DomCall::DispatchEvent {
            target: *target,
            name: event.name.clone(),
            serial: event.serial,
        });
        self.invoke_listeners(target, event);
    }

    fn add_event_listener(
        &self,
        target: &MockElement,
        event: &str,
        callback: EventCallback<MockEvent>,
    ) -> DomResult<MockListener> {
        self.record(DomCall::AddListener {
            target: *target,
            event: event.to_string(),
        });

        let mut state = self.state.lock();
        state.next_listener += 1;
        let id = state.next_listener;
        state.nodes[target.0].listeners.push(RegisteredListener {
            id,
            event: event.to_string(),
            callback,
        });
        Ok(MockListener(id))
    }

    fn remove_event_listener(&self, target: &MockElement, event: &str, listener: &MockListener) {
        self.record(DomCall::RemoveListener {
            target: *target,
            event: event.to_string(),
        });
        self.state.lock().nodes[target.0]
            .listeners
            .retain(|registered| !(registered.id == listener.0 && registered.event == event));
    }

    fn set_style_property(&self, target: &MockElement, property: &str, value: &str) {
        self.record(DomCall::SetStyle {
            target: *target,
            property: property.to_string(),
            value: value.to_string(),
        });
        let mut state = self.state.lock();
        let node = &mut state.nodes[target.0];
        node.has_style_attribute = true;
        node.style.insert(property.to_string(), value.to_string());
    }

    fn remove_style_property(&self, target: &MockElement, property: &str) {
        self.record(DomCall::RemoveStyle {
            target: *target,
            property: property.to_string(),
        });
        self.state.lock().nodes[target.0].style.shift_remove(property);
    }

    fn attribute(&self, target: &MockElement, name: &str) -> Option<String> {
        let state = self.state.lock();
        let node = &state.nodes[target.0];
        if name == "style" {
            node.has_style_attribute.then(|| node.style_text())
        } else {
            node.attributes.get(name).cloned()
        }
    }

    fn remove_attribute(&self, target: &MockElement, name: &str) {
        self.record(DomCall::RemoveAttribute {
            target: *target,
            name: name.to_string(),
        });
        let mut state = self.state.lock();
        let node = &mut state.nodes[target.0];
        if name == "style" {
            node.has_style_attribute = false;
            node.style.clear();
        } else if node.attributes.shift_remove(name).is_some() {
            state.sync_attributes(target.0);
        }
    }

    fn remove(&self, target: &MockElement) {
        self.record(DomCall::Remove { target: *target });
        self.state.lock().detach(target.0);
    }
}

fn element_node(tag: &str, attributes: &IndexMap<String, String>) -> Node {
    let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
    let attributes = attributes
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(name.as_str())),
            value: value.as_str().into(),
        })
        .collect();
    Node::Element(Element::new(name, attributes))
}

fn parse_element_descriptor(descriptor: &str) -> (&str, Option<&str>, Vec<&str>) {
    let tag_end = descriptor.find(['#', '.']).unwrap_or(descriptor.len());
    let tag = match &descriptor[..tag_end] {
        "" => "div",
        tag => tag,
    };

    let mut id = None;
    let mut classes = Vec::new();
    let mut rest = &descriptor[tag_end..];
    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let end = body.find(['#', '.']).unwrap_or(body.len());
        match marker {
            '#' => id = Some(&body[..end]),
            _ => classes.push(&body[..end]),
        }
        rest = &body[end..];
    }

    (tag, id, classes)
}

fn parse_style_text(text: &str) -> IndexMap<String, String> {
    text.split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(property, value)| (property.trim().to_string(), value.trim().to_string()))
        .filter(|(property, _)| !property.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_append_and_query() {
        let dom = MockDom::new();
        let app = dom.append(&dom.body(), "section#app.main.wide");
        let item_a = dom.append(&app, "li.item");
        let item_b = dom.append(&app, "li.item");
        let root = dom.document_element().unwrap();

        assert_eq!(dom.tag(&app), "section");
        assert_eq!(dom.attribute(&app, "class").as_deref(), Some("main wide"));
        assert_eq!(dom.query_selector(&root, "#app").unwrap(), Some(app));
        assert_eq!(
            dom.query_selector_all(&root, ".item").unwrap(),
            vec![item_a, item_b]
        );
        assert_eq!(dom.query_selector_all(&app, "section").unwrap(), vec![]);
    }

    #[test]
    fn test_document_order() {
        let dom = MockDom::new();
        let outer = dom.append(&dom.body(), "div.x");
        let inner = dom.append(&outer, "div.x");
        let sibling = dom.append(&dom.body(), "div.x");
        let root = dom.document_element().unwrap();

        assert_eq!(
            dom.query_selector_all(&root, ".x").unwrap(),
            vec![outer, inner, sibling]
        );
    }

    #[test]
    fn test_invalid_selector() {
        let dom = MockDom::new();
        let err = dom.query_selector(&dom.body(), "a >").unwrap_err();
        assert!(matches!(err, DomError::InvalidSelector { .. }));
    }

    #[test]
    fn test_combinators_and_pseudo_classes() {
        let dom = MockDom::new();
        let list = dom.append(&dom.body(), "ul#list");
        let first = dom.append(&list, "li.item");
        let second = dom.append(&list, "li.item.active");
        let nested = dom.append(&second, "ul");
        let deep = dom.append(&nested, "li.item");
        let root = dom.document_element().unwrap();

        assert_eq!(
            dom.query_selector_all(&root, "#list > li").unwrap(),
            vec![first, second]
        );
        assert_eq!(dom.query_selector_all(&root, "#list li").unwrap(), vec![first, second, deep]);
        assert_eq!(dom.query_selector_all(&root, "li + li").unwrap(), vec![second]);
        assert_eq!(dom.query_selector_all(&root, "li:first-child").unwrap(), vec![first, deep]);
        assert_eq!(
            dom.query_selector_all(&root, "li.item:not(.active)").unwrap(),
            vec![first, deep]
        );
        assert_eq!(dom.query_selector(&list, "li:nth-child(2)").unwrap(), Some(second));
        assert_eq!(dom.query_selector_all(&list, "ul, .active").unwrap(), vec![second, nested]);
    }

    #[test]
    fn test_attribute_changes_are_queryable() {
        let dom = MockDom::new();
        let input = dom.append(&dom.body(), "input");
        let root = dom.document_element().unwrap();

        dom.set_attribute(&input, "type", "checkbox");
        assert_eq!(
            dom.query_selector(&root, "input[type=checkbox]").unwrap(),
            Some(input)
        );

        dom.remove_attribute(&input, "type");
        assert_eq!(dom.query_selector(&root, "[type]").unwrap(), None);
        assert_eq!(dom.parent(&input), Some(dom.body()));
        assert_eq!(dom.parent(&dom.document()), None);
    }

    #[test]
    fn test_listeners_and_dispatch() {
        let dom = MockDom::new();
        let button = dom.append(&dom.body(), "button");
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let listener = dom
            .add_event_listener(&button, "click", Rc::new(move |_: &MockEvent| h.set(h.get() + 1)))
            .unwrap();
        dom.fire(&button, "click");
        dom.fire(&button, "input");
        assert_eq!(hits.get(), 1);
        assert_eq!(dom.listener_count(&button, "click"), 1);

        dom.remove_event_listener(&button, "click", &listener);
        dom.fire(&button, "click");
        assert_eq!(hits.get(), 1);
        assert_eq!(dom.total_listeners(), 0);
    }

    #[test]
    fn test_style_attribute_presence() {
        let dom = MockDom::new();
        let el = dom.append(&dom.body(), "div");
        assert_eq!(dom.attribute(&el, "style"), None);

        dom.set_style_property(&el, "opacity", "0.5");
        assert_eq!(dom.attribute(&el, "style").as_deref(), Some("opacity: 0.5;"));

        dom.remove_style_property(&el, "opacity");
        assert_eq!(dom.attribute(&el, "style").as_deref(), Some(""));

        dom.remove_attribute(&el, "style");
        assert_eq!(dom.attribute(&el, "style"), None);
    }

    #[test]
    fn test_remove_detaches() {
        let dom = MockDom::new();
        let el = dom.append(&dom.body(), "div#gone");
        assert!(dom.is_attached(&el));

        dom.remove(&el);
        assert!(!dom.is_attached(&el));
        let root = dom.document_element().unwrap();
        assert_eq!(dom.query_selector(&root, "#gone").unwrap(), None);
    }

    #[test]
    fn test_clear_calls() {
        let dom = MockDom::new();
        dom.create_event("open").unwrap();
        assert_eq!(dom.count_event_creates(), 1);

        dom.clear_calls();
        assert_eq!(dom.call_count(), 0);
    }
}
