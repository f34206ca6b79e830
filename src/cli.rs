// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pkgwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pkgwatch",
    version,
    about = "Watch a monorepo and run commands in the package a change belongs to.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Pkgwatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Pkgwatch.toml")]
    pub config: String,

    /// Override the configured `[action].run_scripts` command list,
    /// e.g. `--run cargo check`.
    ///
    /// The override is applied once at load time, before validation, so the
    /// rest of the pipeline never sees both values.
    #[arg(long = "run", value_name = "CMD", num_args = 1.., allow_hyphen_values = true)]
    pub run: Option<Vec<String>>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PKGWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print discovered packages and actions, but don't
    /// start watching.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
