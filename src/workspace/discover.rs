// src/workspace/discover.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::workspace::Package;

/// Discover workspace packages by expanding `member` globs against `root`.
///
/// Every directory under `root` (hidden directories excluded) whose
/// root-relative path matches one of the patterns becomes a package; the
/// package name is the directory's file name.
///
/// The result is sorted by directory path, so for nested package directories
/// the outer one comes first. Combined with the resolver's last-match-wins
/// scan this makes nested resolution deterministic: the innermost package
/// owns the path.
pub fn discover_packages(root: &Path, members: &[String]) -> Result<Vec<Package>> {
    let set = build_globset(members)?;

    let mut packages = Vec::new();
    collect_matching_dirs(root, root, &set, &mut packages)?;
    packages.sort_by(|a, b| a.dir.cmp(&b.dir));

    debug!(count = packages.len(), "workspace package discovery complete");
    Ok(packages)
}

fn collect_matching_dirs(
    root: &Path,
    dir: &Path,
    set: &GlobSet,
    out: &mut Vec<Package>,
) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {:?}", dir))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {:?}", dir))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        if let Some(rel) = relative_str(root, &path) {
            if set.is_match(&rel) {
                out.push(Package::new(name, path.clone()));
            }
        }

        collect_matching_dirs(root, &path, set, out)?;
    }

    Ok(())
}

fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob =
            Glob::new(pat).with_context(|| format!("invalid member pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
