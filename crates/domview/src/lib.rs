//! Declarative DOM views and small browser helpers.
//!
//! - [`view`]: views with a root element, a named UI map and declarative
//!   event bindings
//! - [`style`]: inline style application with `x`/`y`/`z` and transform shorthands
//! - [`serialize`]: nested data to form-encoded strings
//! - [`request`]: fetch-style requests decoded by content type
//! - [`resize`]: a single window resize broadcaster
//! - [`events`]: memoized named events
//!
//! Everything talks to the document through the [`Dom`] trait. On `wasm32`
//! the [`web`] module provides the browser implementation.
//!
//! ```ignore
//! use std::rc::Rc;
//! use domview::prelude::*;
//!
//! let services = web::start(&domview::Config::default()).unwrap();
//! let definition = Rc::new(
//!     ViewDefinition::new("counter")
//!         .ui("label", "#count")
//!         .event("click: @ui.label", "increment")
//!         .method("increment", |count: &mut u32, _view, _event| *count += 1),
//! );
//! let mut view = View::new(services, definition, ViewConfig::new().el_selector("#app"), 0);
//! view.render();
//! ```

pub mod dom;
pub mod events;
pub mod request;
pub mod resize;
pub mod serialize;
pub mod services;
pub mod style;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use domview_core::{Config, LogFormat, logging};

pub use dom::{Dom, DomError, DomResult, EventCallback};
pub use events::{EventRegistry, trigger};
pub use resize::{ResizeBroadcaster, ResizeEvent, SubscriberError, SubscriberId};
pub use serialize::serialize;
pub use services::Services;
pub use style::{StyleMap, StyleTarget, apply_style};
pub use view::{View, ViewConfig, ViewContext, ViewDefinition};

pub mod prelude {
    pub use crate::dom::Dom;
    pub use crate::request::{HttpClient, RequestOptions, ResponseBody};
    pub use crate::resize::{ResizeBroadcaster, ResizeEvent};
    pub use crate::services::Services;
    pub use crate::style::{StyleMap, StyleTarget, apply_style};
    pub use crate::view::{
        RootSpec, UiSelector, UiTarget, View, ViewConfig, ViewContext, ViewDefinition,
    };

    #[cfg(target_arch = "wasm32")]
    pub use crate::web;
}
