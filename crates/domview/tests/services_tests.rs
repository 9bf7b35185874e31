//! Shared services: event memoization, named triggers and resize fan-out.

use std::cell::RefCell;
use std::rc::Rc;

use domview::{EventRegistry, ResizeBroadcaster, ResizeEvent, Services, trigger};
use domview_test_utils::MockDom;

#[test]
fn test_global_services_are_shared() {
    let a = Services::new(MockDom::new());
    let b = Services::new(MockDom::new());

    assert!(a.resize().ptr_eq(b.resize()));
    assert!(a.events().ptr_eq(b.events()));
    assert!(a.resize().ptr_eq(&ResizeBroadcaster::global()));
}

#[test]
fn test_isolated_services_are_private() {
    let a = Services::isolated(MockDom::new());
    let b = Services::isolated(MockDom::new());

    assert!(!a.resize().ptr_eq(b.resize()));
    assert!(!a.events().ptr_eq(b.events()));
}

#[test]
fn test_trigger_reuses_event_object() {
    let dom = MockDom::new();
    let registry = EventRegistry::new();
    let button = dom.append(&dom.body(), "button");
    let link = dom.append(&dom.body(), "a");

    trigger(&dom, &registry, &button, "activate");
    trigger(&dom, &registry, &link, "activate");
    trigger(&dom, &registry, &link, "close");

    assert_eq!(dom.count_event_creates(), 2);
    assert_eq!(registry.len(), 2);

    let serials = dom.dispatched_serials("activate");
    assert_eq!(serials.len(), 2);
    assert_eq!(serials[0], serials[1]);
}

#[test]
fn test_trigger_with_invalid_name_dispatches_nothing() {
    let dom = MockDom::new();
    let services = Services::isolated(dom.clone());

    services.trigger(&dom.body(), "");
    services.trigger(&dom.body(), "");

    assert_eq!(dom.count_dispatches(""), 0);
    assert_eq!(dom.count_event_creates(), 2);
    assert!(services.events().is_empty());
}

#[test]
fn test_resize_subscribers_in_order() {
    let resize = ResizeBroadcaster::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let first = {
        let log = Rc::clone(&log);
        resize.add(move |event| log.borrow_mut().push(("first", event.width)))
    };
    {
        let log = Rc::clone(&log);
        resize.add(move |event| log.borrow_mut().push(("second", event.width)));
    }

    resize.notify(&ResizeEvent::new(100.0, 50.0));
    assert!(resize.remove(first));
    assert!(!resize.remove(first));
    resize.notify(&ResizeEvent::new(200.0, 50.0));

    assert_eq!(
        *log.borrow(),
        vec![("first", 100.0), ("second", 100.0), ("second", 200.0)]
    );
}

#[test]
fn test_panicking_subscriber_does_not_stop_others() {
    let resize = ResizeBroadcaster::new();
    let calls = Rc::new(RefCell::new(Vec::new()));

    {
        let calls = Rc::clone(&calls);
        resize.add(move |_| calls.borrow_mut().push("first"));
    }
    resize.add(|_| panic!("layout exploded"));
    {
        let calls = Rc::clone(&calls);
        resize.add(move |_| calls.borrow_mut().push("third"));
    }

    assert_eq!(resize.notify(&ResizeEvent::new(1.0, 1.0)), 1);
    assert_eq!(*calls.borrow(), vec!["first", "third"]);
}

#[test]
fn test_failing_subscriber_is_counted_and_skipped() {
    let resize = ResizeBroadcaster::new();
    let widths = Rc::new(RefCell::new(Vec::new()));

    {
        let widths = Rc::clone(&widths);
        resize.add(move |event| widths.borrow_mut().push(event.width));
    }
    resize.try_add(|event| {
        if event.width < 320.0 {
            return Err("viewport too narrow".into());
        }
        Ok(())
    });
    {
        let widths = Rc::clone(&widths);
        resize.add(move |event| widths.borrow_mut().push(-event.width));
    }

    assert_eq!(resize.notify(&ResizeEvent::new(200.0, 600.0)), 1);
    assert_eq!(resize.notify(&ResizeEvent::new(1024.0, 768.0)), 0);
    assert_eq!(*widths.borrow(), vec![200.0, -200.0, 1024.0, -1024.0]);
}
