// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;
pub mod watch;
pub mod workspace;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::{apply_run_override, load_from_path};
use crate::config::model::ConfigFile;
use crate::config::validate_config;
use crate::engine::{Dispatcher, EventKind, WatchMessage};
use crate::exec::{ActionCallback, ActionRunner, ActionSet, ProcessSpawner, SpawnOptions};
use crate::report::{ClearingReporter, Reporter, TracingReporter};
use crate::watch::{spawn_watcher, DebounceSettings, WatchFilter};
use crate::workspace::{discover_packages, Package};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (with the `--run` override applied before validation)
/// - workspace package discovery
/// - the file watcher
/// - debouncer / execution lock / action runner, via the dispatcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);

    let mut cfg = load_from_path(&config_path)?;
    apply_run_override(&mut cfg, args.run.clone());
    validate_config(&cfg)?;

    let root = config_root_dir(&config_path);
    let packages = discover_packages(&root, &cfg.workspace.members)?;
    info!(count = packages.len(), "discovered workspace packages");

    let actions = ActionSet::resolve(HashMap::new(), cfg.action.run_scripts.clone());

    if args.dry_run {
        print_dry_run(&cfg, &packages, &actions);
        return Ok(());
    }

    run_watch_session(cfg, root, packages, actions).await
}

/// Library entry point: start a watch session with user-registered
/// callbacks taking precedence over the configured command list.
///
/// `callbacks` maps event kinds to asynchronous handlers; kinds without a
/// callback fall back to the configured command (for `change`) or to
/// watch-set maintenance only (for the other kinds).
pub async fn run_with_callbacks(
    cfg: ConfigFile,
    root: PathBuf,
    callbacks: HashMap<EventKind, ActionCallback>,
) -> Result<()> {
    if callbacks.contains_key(&EventKind::Change) {
        config::validate_config_with_callbacks(&cfg)?;
    } else {
        validate_config(&cfg)?;
    }
    let packages = discover_packages(&root, &cfg.workspace.members)?;
    let actions = ActionSet::resolve(callbacks, cfg.action.run_scripts.clone());
    run_watch_session(cfg, root, packages, actions).await
}

async fn run_watch_session(
    cfg: ConfigFile,
    root: PathBuf,
    packages: Vec<Package>,
    actions: ActionSet,
) -> Result<()> {
    let filter = WatchFilter::compile(&cfg.watcher.include, &cfg.watcher.ignore)?;
    let poll_interval = cfg.watcher.poll_interval_ms.map(Duration::from_millis);

    let (messages_tx, messages_rx) = mpsc::channel::<WatchMessage>(256);
    let backend = spawn_watcher(&root, filter, poll_interval, messages_tx.clone())?;

    // Ctrl-C -> graceful shutdown.
    {
        let tx = messages_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(WatchMessage::Shutdown).await;
        });
    }

    let reporter: Arc<dyn Reporter> = if cfg.action.clear_screen {
        Arc::new(ClearingReporter::new(TracingReporter))
    } else {
        Arc::new(TracingReporter)
    };

    let spawner = Arc::new(ProcessSpawner::new(SpawnOptions {
        silent: cfg.action.silent,
        force_color: cfg.action.force_color,
    }));

    let runner = ActionRunner::new(actions, spawner, Arc::clone(&reporter), &root);

    let debounce = DebounceSettings::from_millis(
        cfg.debounce.quiet_ms,
        cfg.debounce.max_wait_ms,
        cfg.debounce.leading,
    );

    let dispatcher = Dispatcher::new(
        packages,
        Box::new(backend),
        runner,
        reporter,
        debounce,
        messages_rx,
    );

    dispatcher.run().await
}

/// Figure out a sensible project root for watching.
/// Currently: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Simple dry-run output: print packages and the resolved action table.
fn print_dry_run(cfg: &ConfigFile, packages: &[Package], actions: &ActionSet) {
    println!("pkgwatch dry-run");
    println!("  watcher.include = {:?}", cfg.watcher.include);
    println!("  watcher.ignore = {:?}", cfg.watcher.ignore);
    println!(
        "  debounce: quiet {} ms, max wait {} ms",
        cfg.debounce.quiet_ms, cfg.debounce.max_wait_ms
    );
    println!();

    println!("packages ({}):", packages.len());
    for pkg in packages {
        println!("  - {} ({})", pkg.name, pkg.dir.display());
    }
    println!();

    println!("actions:");
    for (kind, desc) in actions.describe() {
        println!("  {kind}: {desc}");
    }
}
