// src/watch/debounce.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Debounce timings for the change-event stream.
#[derive(Debug, Clone, Copy)]
pub struct DebounceSettings {
    /// The stream must be quiet this long before the burst fires.
    pub quiet: Duration,
    /// A continuous burst fires at the latest after this long, so action
    /// execution is never delayed indefinitely.
    pub max_wait: Duration,
    /// Also fire immediately on the first event of a new burst. The
    /// trailing fire then only happens if further events arrived.
    pub leading: bool,
}

impl DebounceSettings {
    pub fn from_millis(quiet_ms: u64, max_wait_ms: u64, leading: bool) -> Self {
        Self {
            quiet: Duration::from_millis(quiet_ms),
            max_wait: Duration::from_millis(max_wait_ms),
            leading,
        }
    }
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self::from_millis(2000, 3000, false)
    }
}

/// Spawn the debouncer task: a two-state timer machine between `rx` and `tx`.
///
/// States:
/// - Idle: waiting for the first event of a burst. On arrival, move to
///   Pending (firing immediately when `leading` is set).
/// - Pending: each further event replaces the pending payload and resets
///   the quiet timer. On quiet-timer expiry or max-wait expiry (whichever
///   comes first) the latest payload fires and the machine returns to Idle.
///
/// A burst that fits inside the quiet window therefore fires exactly once,
/// carrying the most recent event; a burst that outlasts the max-wait
/// ceiling fires more than once.
///
/// The task ends when `rx` closes, flushing any pending payload.
pub fn spawn_debouncer<T: Send + 'static>(
    settings: DebounceSettings,
    mut rx: mpsc::Receiver<T>,
    tx: mpsc::Sender<T>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        'idle: while let Some(first) = rx.recv().await {
            let burst_start = Instant::now();
            let max_deadline = burst_start + settings.max_wait;
            let mut pending = Some(first);

            if settings.leading {
                if let Some(event) = pending.take() {
                    debug!("debounce: leading fire");
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            }

            loop {
                let deadline = (Instant::now() + settings.quiet).min(max_deadline);

                tokio::select! {
                    next = rx.recv() => match next {
                        Some(event) => {
                            pending = Some(event);
                        }
                        None => {
                            if let Some(event) = pending.take() {
                                let _ = tx.send(event).await;
                            }
                            return;
                        }
                    },
                    _ = sleep_until(deadline) => {
                        if let Some(event) = pending.take() {
                            debug!("debounce: trailing fire");
                            if tx.send(event).await.is_err() {
                                return;
                            }
                        }
                        continue 'idle;
                    }
                }
            }
        }
    })
}
