// src/core/mod.rs

pub mod chrome;
pub mod dom;
pub mod interact;
pub mod overlay;
pub mod sanitize;
pub mod session;

pub use dom::{DomSource, Element, Locator};
pub use interact::RetryPolicy;
pub use session::Session;
