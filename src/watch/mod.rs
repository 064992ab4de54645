// src/watch/mod.rs

//! Target resolution and polling.
//!
//! This module is responsible for:
//! - Interpreting the user's path/pattern argument as a [`WatchSpec`].
//! - Resolving the "current" file (newest eligible match) on demand.
//! - Polling on a timer and turning resolution outcomes into de-duplicated
//!   [`WatchEvent`]s for the controller.
//!
//! It does **not** know about runs; it only reports which file is current.

pub mod patterns;
pub mod resolver;
pub mod spec;
pub mod tracker;
pub mod watcher;

pub use patterns::NamePattern;
pub use resolver::{resolve, ResolvedTarget};
pub use spec::WatchSpec;
pub use tracker::{WatchEvent, WatchTracker};
pub use watcher::{spawn_watcher, WatcherHandle, DEFAULT_POLL_INTERVAL};
