// tests/common/mod.rs

//! Shared test doubles: a recording reporter, a fake spawner and a mock
//! watch backend.

#![allow(dead_code)]

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use tokio::time::sleep;

use pkgwatch::engine::EventKind;
use pkgwatch::exec::Spawner;
use pkgwatch::report::{Reporter, Tag};
use pkgwatch::watch::WatchBackend;

/// One recorded reporter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    Performed(EventKind, String),
    Completed(EventKind, String),
    WatcherError(String),
    Tagged(Tag, String),
}

/// Reporter that records calls instead of rendering them.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    entries: Arc<Mutex<Vec<ReportEntry>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ReportEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn performed(&self) -> Vec<(EventKind, String)> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                ReportEntry::Performed(kind, path) => Some((kind, path)),
                _ => None,
            })
            .collect()
    }

    pub fn completed(&self) -> Vec<(EventKind, String)> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                ReportEntry::Completed(kind, path) => Some((kind, path)),
                _ => None,
            })
            .collect()
    }

    pub fn watcher_errors(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                ReportEntry::WatcherError(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn tagged(&self, tag: Tag, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(ReportEntry::Tagged(tag, message.to_string()));
    }

    fn action_performed(&self, kind: EventKind, rel_path: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(ReportEntry::Performed(kind, rel_path.to_string()));
    }

    fn action_completed(&self, kind: EventKind, rel_path: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(ReportEntry::Completed(kind, rel_path.to_string()));
    }

    fn watcher_error(&self, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(ReportEntry::WatcherError(message.to_string()));
    }
}

/// Spawner that records calls and optionally fails every spawn.
#[derive(Debug, Clone, Default)]
pub struct FakeSpawner {
    calls: Arc<Mutex<Vec<(Vec<String>, PathBuf)>>>,
    fail_with: Option<String>,
}

impl FakeSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: Arc::default(),
            fail_with: Some(message.into()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<String>, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Spawner for FakeSpawner {
    fn spawn(
        &self,
        argv: &[String],
        dir: &Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let argv = argv.to_vec();
        let dir = dir.to_path_buf();
        let calls = Arc::clone(&self.calls);
        let fail_with = self.fail_with.clone();

        Box::pin(async move {
            calls.lock().unwrap().push((argv, dir));
            match fail_with {
                Some(message) => Err(anyhow!(message)),
                None => Ok(()),
            }
        })
    }
}

/// Spawner that holds each call open for a fixed delay and records when
/// the body entered and exited, for overlap assertions.
#[derive(Debug, Clone)]
pub struct SlowSpawner {
    delay: Duration,
    spans: Arc<Mutex<Vec<(Instant, Instant)>>>,
}

impl SlowSpawner {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            spans: Arc::default(),
        }
    }

    /// One `(entered, exited)` pair per call, in completion order.
    pub fn spans(&self) -> Vec<(Instant, Instant)> {
        self.spans.lock().unwrap().clone()
    }
}

impl Spawner for SlowSpawner {
    fn spawn(
        &self,
        _argv: &[String],
        _dir: &Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let delay = self.delay;
        let spans = Arc::clone(&self.spans);

        Box::pin(async move {
            let entered = Instant::now();
            sleep(delay).await;
            spans.lock().unwrap().push((entered, Instant::now()));
            Ok(())
        })
    }
}

/// Watch backend that records register/unregister calls and never fails.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    registered: Arc<Mutex<Vec<PathBuf>>>,
    unregistered: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered(&self) -> Vec<PathBuf> {
        self.registered.lock().unwrap().clone()
    }

    pub fn unregistered(&self) -> Vec<PathBuf> {
        self.unregistered.lock().unwrap().clone()
    }
}

impl WatchBackend for MockBackend {
    fn register(&mut self, path: &Path) -> Result<()> {
        self.registered.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn unregister(&mut self, path: &Path) -> Result<()> {
        self.unregistered.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}
