// src/exec/action.rs

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::engine::{ActionEvent, EventKind};
use crate::exec::spawner::Spawner;
use crate::report::Reporter;

/// Future returned by a user callback.
pub type ActionFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// A user-supplied asynchronous handler for one event kind.
pub type ActionCallback = Arc<dyn Fn(ActionEvent) -> ActionFuture + Send + Sync>;

/// The unit of work triggered by a filesystem event.
///
/// A tagged variant rather than runtime introspection: which branch runs is
/// declared by configuration, once, at startup.
#[derive(Clone)]
pub enum Action {
    Callback(ActionCallback),
    Command(Vec<String>),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Callback(_) => f.write_str("Callback(..)"),
            Action::Command(argv) => f.debug_tuple("Command").field(argv).finish(),
        }
    }
}

/// The per-event-kind action table, resolved once before watching starts.
///
/// `change` always has an action: a registered callback if there is one,
/// otherwise the configured command list. The other four kinds only have an
/// action when a callback was registered for them; without one, those
/// events merely adjust the watch set.
#[derive(Debug, Clone, Default)]
pub struct ActionSet {
    actions: HashMap<EventKind, Action>,
}

impl ActionSet {
    pub fn resolve(
        callbacks: HashMap<EventKind, ActionCallback>,
        run_scripts: Vec<String>,
    ) -> Self {
        let mut actions: HashMap<EventKind, Action> = callbacks
            .into_iter()
            .map(|(kind, cb)| (kind, Action::Callback(cb)))
            .collect();

        actions
            .entry(EventKind::Change)
            .or_insert_with(|| Action::Command(run_scripts));

        Self { actions }
    }

    pub fn get(&self, kind: EventKind) -> Option<&Action> {
        self.actions.get(&kind)
    }

    /// One line per event kind, for `--dry-run` output.
    pub fn describe(&self) -> Vec<(EventKind, String)> {
        EventKind::ALL
            .iter()
            .map(|kind| {
                let desc = match self.actions.get(kind) {
                    Some(Action::Callback(_)) => "user callback".to_string(),
                    Some(Action::Command(argv)) => format!("spawn: {}", argv.join(" ")),
                    None => "none".to_string(),
                };
                (*kind, desc)
            })
            .collect()
    }
}

/// Runs the action resolved for an event, bracketing it with one
/// "performed" and one "completed" report.
///
/// Failures are not recovered here: a failed callback or spawn returns
/// `Err` before the "completed" report, and the caller decides whether that
/// ends the process.
#[derive(Clone)]
pub struct ActionRunner {
    actions: ActionSet,
    spawner: Arc<dyn Spawner>,
    reporter: Arc<dyn Reporter>,
    root: PathBuf,
}

impl ActionRunner {
    pub fn new(
        actions: ActionSet,
        spawner: Arc<dyn Spawner>,
        reporter: Arc<dyn Reporter>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            actions,
            spawner,
            reporter,
            root: root.into(),
        }
    }

    /// Whether any action is configured for this event kind.
    pub fn has_action(&self, kind: EventKind) -> bool {
        self.actions.get(kind).is_some()
    }

    /// Run the action configured for the event's kind to completion.
    pub async fn run(&self, event: ActionEvent) -> Result<()> {
        let Some(action) = self.actions.get(event.kind) else {
            debug!(kind = %event.kind, "no action configured; skipping");
            return Ok(());
        };

        let kind = event.kind;
        let rel = event.rel_path(&self.root);
        self.reporter.action_performed(kind, &rel);

        match action {
            Action::Callback(callback) => callback(event.clone()).await?,
            Action::Command(argv) => {
                self.spawner.spawn(argv, &event.package_dir).await?;
            }
        }

        self.reporter.action_completed(kind, &rel);
        Ok(())
    }
}

impl fmt::Debug for ActionRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRunner")
            .field("actions", &self.actions)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
