// src/config/validate.rs

use anyhow::{anyhow, Context, Result};
use globset::Glob;

use crate::config::model::ConfigFile;

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - `[action].run_scripts` is non-empty (spawning an empty command list is
///   never meaningful and must be rejected before watching starts)
/// - `[workspace].members` is non-empty
/// - debounce timings are sane (`quiet_ms >= 1`, `max_wait_ms >= quiet_ms`)
/// - all glob patterns compile
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_action(cfg)?;
    validate_config_with_callbacks(cfg)
}

/// Validation for library callers that registered a callback for `change`:
/// the command list is never spawned then, so it may stay empty.
pub fn validate_config_with_callbacks(cfg: &ConfigFile) -> Result<()> {
    validate_workspace(cfg)?;
    validate_debounce(cfg)?;
    validate_patterns(cfg)?;
    Ok(())
}

fn validate_action(cfg: &ConfigFile) -> Result<()> {
    if cfg.action.run_scripts.is_empty() {
        return Err(anyhow!(
            "[action].run_scripts must name at least an executable \
             (set it in the config file or pass --run)"
        ));
    }
    Ok(())
}

fn validate_workspace(cfg: &ConfigFile) -> Result<()> {
    if cfg.workspace.members.is_empty() {
        return Err(anyhow!(
            "[workspace].members must contain at least one pattern"
        ));
    }
    Ok(())
}

fn validate_debounce(cfg: &ConfigFile) -> Result<()> {
    if cfg.debounce.quiet_ms == 0 {
        return Err(anyhow!("[debounce].quiet_ms must be >= 1 (got 0)"));
    }
    if cfg.debounce.max_wait_ms < cfg.debounce.quiet_ms {
        return Err(anyhow!(
            "[debounce].max_wait_ms ({}) must be >= quiet_ms ({})",
            cfg.debounce.max_wait_ms,
            cfg.debounce.quiet_ms
        ));
    }
    Ok(())
}

fn validate_patterns(cfg: &ConfigFile) -> Result<()> {
    for pat in cfg
        .workspace
        .members
        .iter()
        .chain(cfg.watcher.include.iter())
        .chain(cfg.watcher.ignore.iter())
    {
        Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
    }
    Ok(())
}
