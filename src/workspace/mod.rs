// src/workspace/mod.rs

//! Workspace package discovery and path-to-package resolution.
//!
//! A "package" is a sub-project of the monorepo with its own directory.
//! Packages are discovered once at startup by expanding the
//! `[workspace].members` globs; the list is read-only afterwards.

pub mod discover;
pub mod resolver;

use std::path::PathBuf;

pub use discover::discover_packages;
pub use resolver::resolve_package;

/// A workspace package: a name and the directory it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub dir: PathBuf,
}

impl Package {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }
}
