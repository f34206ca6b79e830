// src/report.rs

//! The structured reporting sink.
//!
//! The core only states *what* happened ("action performed", "action
//! completed", watcher errors); rendering is up to the implementation.
//! Production uses [`TracingReporter`]; tests record calls instead.

use tracing::{error, info, warn};

use crate::engine::EventKind;

/// Tag attached to a structured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Log,
    Info,
    Success,
    Error,
    Warn,
}

/// Sink for the core's user-facing messages.
///
/// Exactly one `action_performed` precedes each action body and exactly one
/// `action_completed` follows it on success.
pub trait Reporter: Send + Sync {
    fn tagged(&self, tag: Tag, message: &str);

    fn action_performed(&self, kind: EventKind, rel_path: &str) {
        self.tagged(Tag::Info, &format!("action performed [{kind}] {rel_path}"));
    }

    fn action_completed(&self, kind: EventKind, rel_path: &str) {
        self.tagged(Tag::Success, &format!("action completed [{kind}] {rel_path}"));
    }

    fn watcher_error(&self, message: &str) {
        self.tagged(Tag::Error, &format!("watcher error: {message}"));
    }
}

/// Renders reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn tagged(&self, tag: Tag, message: &str) {
        match tag {
            Tag::Log | Tag::Info => info!("{message}"),
            Tag::Success => info!(outcome = "success", "{message}"),
            Tag::Error => error!("{message}"),
            Tag::Warn => warn!("{message}"),
        }
    }
}

/// Wrapper that clears the terminal before each "action performed" report.
///
/// Plain composition instead of a hook mechanism: wrap the inner reporter
/// where the clearing behaviour is wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearingReporter<R> {
    inner: R,
}

impl<R> ClearingReporter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Reporter> Reporter for ClearingReporter<R> {
    fn tagged(&self, tag: Tag, message: &str) {
        self.inner.tagged(tag, message);
    }

    fn action_performed(&self, kind: EventKind, rel_path: &str) {
        // ANSI clear screen + cursor home.
        print!("\x1b[2J\x1b[H");
        self.inner.action_performed(kind, rel_path);
    }
}
