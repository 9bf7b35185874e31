//! Browser backend built on `web-sys`.

mod dom;
mod fetch;
mod resize;

pub use dom::{WebDom, WebListener};
pub use fetch::{FetchResponse, FetchTransport};

use domview_core::{Config, logging};
use wasm_bindgen::JsValue;

use crate::dom::{DomError, DomResult};
use crate::request::Location;
use crate::resize::ResizeBroadcaster;
use crate::services::Services;

/// Bootstrap a page: install logging, forward window resizes to the global
/// broadcaster and return services bound to the current document.
pub fn start(config: &Config) -> DomResult<Services<WebDom>> {
    logging::init_with(config);
    let dom = WebDom::new().ok_or(DomError::NoDocument)?;
    ResizeBroadcaster::global().attach_to_window()?;
    Ok(Services::new(dom))
}

/// Origin and address of the current page.
pub fn window_location() -> Option<Location> {
    let location = web_sys::window()?.location();
    Some(Location::new(location.origin().ok()?, location.href().ok()?))
}

pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
