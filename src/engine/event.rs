// src/engine/event.rs

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::workspace::Package;

/// The five notification kinds delivered by the watch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Add,
    AddDir,
    Change,
    Unlink,
    UnlinkDir,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Add,
        EventKind::AddDir,
        EventKind::Change,
        EventKind::Unlink,
        EventKind::UnlinkDir,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventKind::Add => "add",
            EventKind::AddDir => "addDir",
            EventKind::Change => "change",
            EventKind::Unlink => "unlink",
            EventKind::UnlinkDir => "unlinkDir",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Best-effort file metadata attached to add/change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileStats {
    /// Stat the path, returning `None` if it is already gone.
    pub fn probe(path: &Path) -> Option<Self> {
        fs::metadata(path).ok().map(|meta| Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// One raw notification from the watch session, before package resolution.
#[derive(Debug, Clone)]
pub struct ChangeNotice {
    pub kind: EventKind,
    pub path: PathBuf,
    pub stats: Option<FileStats>,
}

/// The context handed to an action: the notification plus the owning
/// package. Created per notification, consumed once, never persisted.
#[derive(Debug, Clone)]
pub struct ActionEvent {
    pub kind: EventKind,
    pub path: PathBuf,
    pub package_name: String,
    pub package_dir: PathBuf,
    pub stats: Option<FileStats>,
}

impl ActionEvent {
    pub fn from_notice(notice: ChangeNotice, package: &Package) -> Self {
        Self {
            kind: notice.kind,
            path: notice.path,
            package_name: package.name.clone(),
            package_dir: package.dir.clone(),
            stats: notice.stats,
        }
    }

    /// The event path relative to the workspace root, with forward slashes.
    /// Falls back to the full path if it is not under the root.
    pub fn rel_path(&self, root: &Path) -> String {
        self.path
            .strip_prefix(root)
            .unwrap_or(&self.path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

/// Messages flowing from the watch session (and the signal handler) into
/// the dispatcher loop.
#[derive(Debug)]
pub enum WatchMessage {
    Event(ChangeNotice),
    /// A watcher-level error. Reported, never fatal.
    Error(String),
    Shutdown,
}
