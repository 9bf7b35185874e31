//! Test utilities for domview.
//!
//! This crate provides an in-memory document and a scripted HTTP transport so
//! views and helpers can be tested without a browser.
//!
//! # Overview
//!
//! - `MockDom` - In-memory [`domview::Dom`] backed by a `scraper` document,
//!   recording every call (requires `mock` feature)
//! - `MockTransport` - Scripted [`domview::request::Transport`] (requires `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use domview::{StyleMap, StyleTarget, apply_style};
//! use domview_test_utils::MockDom;
//!
//! let dom = MockDom::new();
//! let card = dom.append(&dom.body(), "div.card");
//!
//! apply_style(&dom, StyleTarget::Element(&card), &StyleMap::new().set("x", "10px"));
//!
//! assert_eq!(dom.style(&card, "transform").as_deref(), Some("translate3d(10px, 0, 0) "));
//! assert_eq!(dom.count_style_writes(), 1);
//! # }
//! ```
//!
//! # Interior Mutability
//!
//! Mocks take `&self` everywhere and record into `parking_lot::Mutex`
//! guarded state. Locks are never held while user callbacks run, so a
//! listener may call back into the document.

#[cfg(feature = "mock")]
pub mod mock_dom;
#[cfg(feature = "mock")]
pub mod mock_transport;

#[cfg(feature = "mock")]
pub use mock_dom::*;
#[cfg(feature = "mock")]
pub use mock_transport::*;
