//! Window resize fan-out.
//!
//! A single broadcaster per thread receives window resize notifications and
//! forwards them to every subscriber in subscription order. In the browser the
//! broadcaster is wired to `window` once via `attach_to_window` (wasm32 only);
//! elsewhere [`ResizeBroadcaster::notify`] is driven directly.
//!
//! Subscribers report failure by returning `Err`; the broadcaster logs it and
//! moves on to the next subscriber. Panics are also caught, but only where
//! unwinding exists: wasm32 builds abort on panic, so a subscriber that must
//! not take the page down has to return an error instead.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

thread_local! {
    static GLOBAL_BROADCASTER: ResizeBroadcaster = ResizeBroadcaster::new();
}

/// Viewport dimensions delivered with a resize notification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResizeEvent {
    pub width: f64,
    pub height: f64,
}

impl ResizeEvent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Error returned by a failing subscriber.
pub type SubscriberError = Box<dyn std::error::Error>;

/// Subscriber callback.
pub type ResizeCallback = Rc<dyn Fn(&ResizeEvent) -> Result<(), SubscriberError>>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriberId, ResizeCallback)>,
    attached: bool,
}

/// Ordered list of resize subscribers. Clones share the same list.
#[derive(Clone, Default)]
pub struct ResizeBroadcaster {
    inner: Rc<RefCell<Subscribers>>,
}

impl ResizeBroadcaster {
    /// Create an empty broadcaster that is not attached to any window.
    pub fn new() -> Self {
        Self::default()
    }

    /// The broadcaster shared by every view on this thread.
    pub fn global() -> Self {
        GLOBAL_BROADCASTER.with(|broadcaster| broadcaster.clone())
    }

    /// Append a subscriber that cannot fail. The same closure may be added
    /// more than once.
    pub fn add(&self, callback: impl Fn(&ResizeEvent) + 'static) -> SubscriberId {
        self.try_add(move |event| {
            callback(event);
            Ok(())
        })
    }

    /// Append a subscriber whose errors are logged and counted by
    /// [`ResizeBroadcaster::notify`].
    pub fn try_add(
        &self,
        callback: impl Fn(&ResizeEvent) -> Result<(), SubscriberError> + 'static,
    ) -> SubscriberId {
        self.add_rc(Rc::new(callback))
    }

    /// Append an already shared subscriber.
    pub fn add_rc(&self, callback: ResizeCallback) -> SubscriberId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriberId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push((id, callback));
        id
    }

    /// Remove the subscription `id`. Returns `false` if it was not present.
    pub fn remove(&self, id: SubscriberId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                inner.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.inner.borrow().entries.iter().any(|(entry, _)| *entry == id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Drop every subscriber.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Invoke every subscriber with `event`, in subscription order.
    ///
    /// The pass runs over a snapshot, so subscribers may add or remove
    /// subscriptions while being notified. A subscriber returning `Err` is
    /// logged and does not stop the pass. On targets that unwind, a panicking
    /// subscriber is treated the same way. Returns the number of subscribers
    /// that failed.
    pub fn notify(&self, event: &ResizeEvent) -> usize {
        let snapshot: Vec<(SubscriberId, ResizeCallback)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();

        let mut failed = 0;
        for (id, callback) in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    failed += 1;
                    tracing::error!("resize subscriber {:?} failed: {}", id, err);
                }
                Err(payload) => {
                    failed += 1;
                    tracing::error!(
                        "resize subscriber {:?} panicked: {}",
                        id,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        failed
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub(crate) fn is_attached(&self) -> bool {
        self.inner.borrow().attached
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub(crate) fn mark_attached(&self) {
        self.inner.borrow_mut().attached = true;
    }
}

impl std::fmt::Debug for ResizeBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ResizeBroadcaster")
            .field("subscribers", &inner.entries.len())
            .field("attached", &inner.attached)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
