// src/engine/lock.rs

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// The single lock key guarding change-triggered action bodies.
pub const CHANGE_ACTION_LOCK: &str = "change-action";

/// A named single-slot mutual-exclusion gate.
///
/// At most one action body runs while the lock is held; callers arriving
/// while it is held are queued in arrival order (`tokio::sync::Mutex` is
/// FIFO-fair) and run sequentially. There is no timeout: a hung action
/// blocks all future acquisitions.
#[derive(Debug, Clone)]
pub struct ExecutionLock {
    name: &'static str,
    inner: Arc<Mutex<()>>,
}

impl ExecutionLock {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wait for the lock. The returned guard releases it on drop, so the
    /// release is unconditional even when the guarded work fails.
    pub async fn acquire(&self) -> OwnedMutexGuard<()> {
        debug!(lock = self.name, "waiting for execution lock");
        let guard = Arc::clone(&self.inner).lock_owned().await;
        debug!(lock = self.name, "execution lock acquired");
        guard
    }
}
