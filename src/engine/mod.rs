// src/engine/mod.rs

//! Event dispatch core for pkgwatch.
//!
//! This module ties together:
//! - the event model shared between the watcher and the action layer
//! - the single execution lock serializing change-triggered actions
//! - the dispatcher loop that routes each event kind to its handling:
//!   add/unlink events adjust the watch set and run unserialized, change
//!   events flow through debouncer -> lock -> action runner.

pub mod dispatcher;
pub mod event;
pub mod lock;

pub use dispatcher::Dispatcher;
pub use event::{ActionEvent, ChangeNotice, EventKind, FileStats, WatchMessage};
pub use lock::{ExecutionLock, CHANGE_ACTION_LOCK};
