// src/exec/mod.rs

//! Action execution layer.
//!
//! - [`action`] owns the per-event-kind action table and the runner that
//!   reports, executes, and reports again.
//! - [`spawner`] actually runs the configured command inside a package
//!   directory, using `tokio::process::Command`.

pub mod action;
pub mod spawner;

pub use action::{Action, ActionCallback, ActionFuture, ActionRunner, ActionSet};
pub use spawner::{ProcessSpawner, SpawnOptions, Spawner};
