// src/config/mod.rs

//! Configuration loading and validation for pkgwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate invariants like non-empty command lists and sane debounce
//!   timings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_run_override, load_and_validate, load_from_path};
pub use model::{ActionSection, ConfigFile, DebounceSection, WatcherSection, WorkspaceSection};
pub use validate::{validate_config, validate_config_with_callbacks};
