use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use super::js_message;
use crate::dom::{DomError, DomResult};
use crate::resize::{ResizeBroadcaster, ResizeEvent};

impl ResizeBroadcaster {
    /// Forward the window's `resize` events to this broadcaster.
    ///
    /// The listener lives for the rest of the page; attaching twice is a no-op.
    pub fn attach_to_window(&self) -> DomResult<()> {
        if self.is_attached() {
            return Ok(());
        }

        let window = web_sys::window().ok_or(DomError::NoDocument)?;
        let broadcaster = self.clone();
        let source = window.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let width = source.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or_default();
            let height = source.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or_default();
            broadcaster.notify(&ResizeEvent::new(width, height));
        }) as Box<dyn Fn(web_sys::Event)>);

        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|err| DomError::Listener {
                event: "resize".to_string(),
                message: js_message(&err),
            })?;
        closure.forget();

        self.mark_attached();
        tracing::debug!("resize broadcaster attached to window");
        Ok(())
    }
}
