//! domview Core
//!
//! Shared plumbing for the domview crates: hash collections, logging
//! bootstrap and runtime configuration.

pub mod alloc;
pub mod config;
pub mod logging;

pub use config::{Config, LogFormat};
