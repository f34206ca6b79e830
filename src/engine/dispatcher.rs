// src/engine/dispatcher.rs

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::event::{ActionEvent, ChangeNotice, EventKind, WatchMessage};
use crate::engine::lock::{ExecutionLock, CHANGE_ACTION_LOCK};
use crate::exec::ActionRunner;
use crate::report::Reporter;
use crate::watch::debounce::{spawn_debouncer, DebounceSettings};
use crate::watch::watcher::WatchBackend;
use crate::workspace::{resolve_package, Package};

/// The coordinating shell of the watch pipeline.
///
/// Consumes [`WatchMessage`]s from the watch session and routes each event
/// kind:
///
/// - `add`/`addDir`: register the path with the backend so future changes to
///   it are detected, then run the configured action (if any) unserialized.
/// - `unlink`/`unlinkDir`: unregister the path, then run the configured
///   action (if any) unserialized.
/// - `change`: resolve the owning package, push the event through the
///   debouncer, and run the debounced action as a detached task holding
///   the single execution lock. The lock, not the loop, is what keeps
///   change bodies from overlapping; the loop stays free to dispatch
///   further events while one runs.
/// - watcher errors: reported and ignored; watching continues.
///
/// Action failures are never swallowed: every detached action funnels its
/// `Err` back through an internal channel, which terminates the loop.
pub struct Dispatcher {
    packages: Vec<Package>,
    backend: Box<dyn WatchBackend>,
    runner: ActionRunner,
    reporter: Arc<dyn Reporter>,
    lock: ExecutionLock,

    messages_rx: mpsc::Receiver<WatchMessage>,

    /// Input to the debouncer; resolved change events go here.
    change_tx: mpsc::Sender<ActionEvent>,
    /// Output of the debouncer; at most one event per burst comes back.
    debounced_rx: mpsc::Receiver<ActionEvent>,

    /// Failure funnel for unserialized add/unlink actions.
    fail_tx: mpsc::Sender<anyhow::Error>,
    fail_rx: mpsc::Receiver<anyhow::Error>,

    _debouncer: JoinHandle<()>,
}

impl Dispatcher {
    pub fn new(
        packages: Vec<Package>,
        backend: Box<dyn WatchBackend>,
        runner: ActionRunner,
        reporter: Arc<dyn Reporter>,
        debounce: DebounceSettings,
        messages_rx: mpsc::Receiver<WatchMessage>,
    ) -> Self {
        let (change_tx, change_rx) = mpsc::channel::<ActionEvent>(64);
        let (fire_tx, debounced_rx) = mpsc::channel::<ActionEvent>(64);
        let debouncer = spawn_debouncer(debounce, change_rx, fire_tx);

        let (fail_tx, fail_rx) = mpsc::channel::<anyhow::Error>(8);

        Self {
            packages,
            backend,
            runner,
            reporter,
            lock: ExecutionLock::new(CHANGE_ACTION_LOCK),
            messages_rx,
            change_tx,
            debounced_rx,
            fail_tx,
            fail_rx,
            _debouncer: debouncer,
        }
    }

    /// Main event loop. Runs until the message channel closes, a shutdown
    /// message arrives, or an action fails.
    pub async fn run(mut self) -> Result<()> {
        info!("dispatcher started");

        loop {
            tokio::select! {
                msg = self.messages_rx.recv() => match msg {
                    Some(WatchMessage::Event(notice)) => self.handle_notice(notice).await?,
                    Some(WatchMessage::Error(message)) => {
                        // Watcher errors are never fatal.
                        self.reporter.watcher_error(&message);
                    }
                    Some(WatchMessage::Shutdown) => {
                        info!("shutdown requested, stopping dispatcher");
                        break;
                    }
                    None => break,
                },
                Some(event) = self.debounced_rx.recv() => {
                    self.handle_change(event);
                }
                Some(err) = self.fail_rx.recv() => {
                    return Err(err);
                }
            }
        }

        info!("dispatcher exiting");
        Ok(())
    }

    async fn handle_notice(&mut self, notice: ChangeNotice) -> Result<()> {
        debug!(kind = %notice.kind, path = %notice.path.display(), "watch event");

        match notice.kind {
            EventKind::Add | EventKind::AddDir => {
                if let Err(err) = self.backend.register(&notice.path) {
                    warn!(
                        path = %notice.path.display(),
                        error = %err,
                        "failed to extend watch set"
                    );
                }
                self.run_unserialized(notice)
            }
            EventKind::Unlink | EventKind::UnlinkDir => {
                if let Err(err) = self.backend.unregister(&notice.path) {
                    warn!(
                        path = %notice.path.display(),
                        error = %err,
                        "failed to shrink watch set"
                    );
                }
                self.run_unserialized(notice)
            }
            EventKind::Change => self.enqueue_change(notice).await,
        }
    }

    /// Run an add/unlink action as a detached task: these are not debounced
    /// and not serialized against anything. Failures come back through the
    /// failure funnel.
    fn run_unserialized(&mut self, notice: ChangeNotice) -> Result<()> {
        let Some(package) = resolve_package(&notice.path, &self.packages) else {
            debug!(path = %notice.path.display(), "path not owned by any package");
            return Ok(());
        };

        if !self.runner.has_action(notice.kind) {
            return Ok(());
        }

        let event = ActionEvent::from_notice(notice, package);
        let runner = self.runner.clone();
        let fail_tx = self.fail_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = runner.run(event).await {
                let _ = fail_tx.send(err).await;
            }
        });

        Ok(())
    }

    async fn enqueue_change(&mut self, notice: ChangeNotice) -> Result<()> {
        let Some(package) = resolve_package(&notice.path, &self.packages) else {
            debug!(path = %notice.path.display(), "path not owned by any package");
            return Ok(());
        };

        let event = ActionEvent::from_notice(notice, package);
        self.change_tx
            .send(event)
            .await
            .map_err(|_| anyhow!("debouncer channel closed"))
    }

    /// Launch a debounced change action as a detached task that acquires
    /// the execution lock itself. The guard is dropped when the body
    /// finishes, success or failure, so the lock is always released.
    /// Failures come back through the failure funnel.
    fn handle_change(&mut self, event: ActionEvent) {
        let lock = self.lock.clone();
        let runner = self.runner.clone();
        let fail_tx = self.fail_tx.clone();
        tokio::spawn(async move {
            let _guard = lock.acquire().await;
            if let Err(err) = runner.run(event).await {
                let _ = fail_tx.send(err).await;
            }
        });
    }
}
