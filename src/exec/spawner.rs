// src/exec/spawner.rs

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// I/O and environment policy for spawned commands.
#[derive(Debug, Clone)]
pub struct SpawnOptions {
    /// Discard all three standard streams of the child.
    pub silent: bool,
    /// Set color-forcing environment variables on the child. The parent's
    /// own environment is never touched.
    pub force_color: bool,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            silent: false,
            force_color: true,
        }
    }
}

/// Seam for command execution so tests can substitute a fake.
pub trait Spawner: Send + Sync {
    /// Run `argv` (head = executable, rest = arguments) inside `dir`,
    /// resolving once the child has exited.
    fn spawn(
        &self,
        argv: &[String],
        dir: &Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production [`Spawner`] over `tokio::process::Command`.
///
/// Only the invoking continuation is suspended while the child runs; the
/// scheduler keeps serving other events.
///
/// Failure policy: an OS-level spawn error, a non-zero exit, or **any**
/// stderr output is a hard failure. Stderr is forwarded line by line to the
/// parent's stderr as it arrives.
#[derive(Debug, Clone, Default)]
pub struct ProcessSpawner {
    options: SpawnOptions,
}

impl ProcessSpawner {
    pub fn new(options: SpawnOptions) -> Self {
        Self { options }
    }
}

impl Spawner for ProcessSpawner {
    fn spawn(
        &self,
        argv: &[String],
        dir: &Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let argv = argv.to_vec();
        let dir = dir.to_path_buf();
        Box::pin(async move { run_command(&argv, &dir, &self.options).await })
    }
}

async fn run_command(argv: &[String], dir: &Path, options: &SpawnOptions) -> Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("empty command list"))?;

    info!(cmd = %argv.join(" "), dir = %dir.display(), "spawning command");

    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir).kill_on_drop(true);

    if options.force_color {
        cmd.env("FORCE_COLOR", "1").env("CLICOLOR_FORCE", "1");
    }

    if options.silent {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
    } else {
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{program}' in {}", dir.display()))?;

    // Stdout is inherited (or discarded), so draining stderr before waiting
    // cannot deadlock.
    let mut stderr_lines = 0usize;
    if let Some(stderr) = child.stderr.take() {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            eprintln!("{line}");
            stderr_lines += 1;
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for '{program}'"))?;

    if stderr_lines > 0 {
        return Err(anyhow!(
            "command '{}' wrote {stderr_lines} line(s) to stderr",
            argv.join(" ")
        ));
    }

    if !status.success() {
        let code = status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        return Err(anyhow!("command '{}' exited with {code}", argv.join(" ")));
    }

    debug!(cmd = %argv.join(" "), "command finished cleanly");
    Ok(())
}
