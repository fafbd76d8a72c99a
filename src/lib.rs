// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod log;
pub mod progress;
pub mod scrape;
pub mod specs;
pub mod store;
pub mod tooltip;
