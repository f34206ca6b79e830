// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that, or validate separately
/// after applying CLI overrides.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// The recommended entry point when there are no CLI overrides to apply:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks command lists, debounce timings and glob patterns.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Apply the CLI `--run` override to a loaded configuration.
///
/// Precedence is decided here, once, before validation: a non-empty CLI
/// command list replaces `[action].run_scripts` entirely.
pub fn apply_run_override(config: &mut ConfigFile, run: Option<Vec<String>>) {
    if let Some(run) = run {
        if !run.is_empty() {
            config.action.run_scripts = run;
        }
    }
}
