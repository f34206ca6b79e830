// src/watch/mod.rs

//! File watching and change coalescing.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) and mapping
//!   its events onto the five pkgwatch event kinds.
//! - Compiling include/ignore glob rules for the watch session.
//! - Debouncing bursts of change events with a quiet window and a max-wait
//!   ceiling.
//!
//! It does **not** know about packages or actions; it only turns raw
//! filesystem activity into a filtered, coalesced event stream.

pub mod debounce;
pub mod watcher;

pub use debounce::{spawn_debouncer, DebounceSettings};
pub use watcher::{spawn_watcher, NotifyBackend, WatchBackend, WatchFilter};
