// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::event::{CreateKind, EventKind as NotifyKind, ModifyKind, RemoveKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{ChangeNotice, EventKind, FileStats, WatchMessage};

/// The watch primitive as seen by the dispatcher: a mutable set of watched
/// paths, grown on add events and shrunk on unlink events.
///
/// Both operations are idempotent: double-register and double-unregister
/// are no-ops, not errors.
pub trait WatchBackend: Send {
    fn register(&mut self, path: &Path) -> Result<()>;
    fn unregister(&mut self, path: &Path) -> Result<()>;
}

/// Compiled include/ignore rules for the watch session.
///
/// Paths are matched relative to the project root, with forward slashes.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    include: GlobSet,
    ignore: Option<GlobSet>,
}

impl WatchFilter {
    pub fn compile(include: &[String], ignore: &[String]) -> Result<Self> {
        let include_set =
            build_globset(include).context("building include globset")?;
        let ignore_set = if ignore.is_empty() {
            None
        } else {
            Some(build_globset(ignore).context("building ignore globset")?)
        };

        Ok(Self {
            include: include_set,
            ignore: ignore_set,
        })
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include.is_match(rel_path) {
            return false;
        }
        if let Some(ignore) = &self.ignore {
            if ignore.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// [`WatchBackend`] over `notify`'s recommended watcher.
///
/// Owning this keeps the underlying watcher alive; dropping it stops file
/// watching.
pub struct NotifyBackend {
    watcher: RecommendedWatcher,
    watched: HashSet<PathBuf>,
}

impl std::fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyBackend")
            .field("watched", &self.watched.len())
            .finish_non_exhaustive()
    }
}

impl WatchBackend for NotifyBackend {
    fn register(&mut self, path: &Path) -> Result<()> {
        if !self.watched.insert(path.to_path_buf()) {
            return Ok(());
        }
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching {:?}", path))?;
        debug!(path = %path.display(), "path added to watch set");
        Ok(())
    }

    fn unregister(&mut self, path: &Path) -> Result<()> {
        if !self.watched.remove(path) {
            return Ok(());
        }
        // The OS-level watch is usually already gone once the path was
        // unlinked; a failure here is not worth surfacing.
        if let Err(err) = self.watcher.unwatch(path) {
            debug!(path = %path.display(), error = %err, "unwatch failed");
        } else {
            debug!(path = %path.display(), "path removed from watch set");
        }
        Ok(())
    }
}

/// Start the watch session on `root` (recursively) and forward filtered,
/// mapped events into `messages_tx`.
///
/// Watcher-level errors are forwarded as [`WatchMessage::Error`]; they never
/// terminate the session. The returned backend keeps the watcher alive and
/// lets the dispatcher grow/shrink the watch set.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    filter: WatchFilter,
    poll_interval: Option<Duration>,
    messages_tx: mpsc::Sender<WatchMessage>,
) -> Result<NotifyBackend> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    // Channel from the blocking notify callback into the async world.
    let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut config = Config::default();
    if let Some(interval) = poll_interval {
        config = config.with_poll_interval(interval);
    }

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if raw_tx.send(res).is_err() {
                // We can't log via tracing here easily, so fallback to stderr.
                eprintln!("pkgwatch: failed to forward notify event");
            }
        },
        config,
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    // Async task that consumes notify results and forwards watch messages.
    let loop_root = root.clone();
    tokio::spawn(async move {
        while let Some(res) = raw_rx.recv().await {
            let messages = match res {
                Ok(event) => notices_from_event(&loop_root, &filter, &event)
                    .into_iter()
                    .map(WatchMessage::Event)
                    .collect::<Vec<_>>(),
                Err(err) => vec![WatchMessage::Error(err.to_string())],
            };

            for message in messages {
                if messages_tx.send(message).await.is_err() {
                    // Dispatcher gone; no point keeping the loop alive.
                    return;
                }
            }
        }

        debug!("watch event loop ended");
    });

    let mut watched = HashSet::new();
    watched.insert(root);

    Ok(NotifyBackend { watcher, watched })
}

/// Map one notify event into zero or more pkgwatch notices, applying the
/// include/ignore filter against root-relative paths.
fn notices_from_event(root: &Path, filter: &WatchFilter, event: &Event) -> Vec<ChangeNotice> {
    let Some(kind) = map_kind(&event.kind) else {
        return Vec::new();
    };

    let mut notices = Vec::new();
    for path in &event.paths {
        let Some(rel) = relative_str(root, path) else {
            warn!(
                "could not relativize path {:?} against root {:?}",
                path, root
            );
            continue;
        };

        if !filter.matches(&rel) {
            continue;
        }

        let stats = match kind {
            EventKind::Add | EventKind::AddDir | EventKind::Change => FileStats::probe(path),
            EventKind::Unlink | EventKind::UnlinkDir => None,
        };

        notices.push(ChangeNotice {
            kind,
            path: path.clone(),
            stats,
        });
    }
    notices
}

fn map_kind(kind: &NotifyKind) -> Option<EventKind> {
    match kind {
        NotifyKind::Create(CreateKind::Folder) => Some(EventKind::AddDir),
        NotifyKind::Create(_) => Some(EventKind::Add),
        // Metadata-only changes (permissions, mtime touches) are noise here.
        NotifyKind::Modify(ModifyKind::Metadata(_)) => None,
        NotifyKind::Modify(_) => Some(EventKind::Change),
        NotifyKind::Remove(RemoveKind::Folder) => Some(EventKind::UnlinkDir),
        NotifyKind::Remove(_) => Some(EventKind::Unlink),
        _ => None,
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
