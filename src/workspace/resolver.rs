// src/workspace/resolver.rs

use std::path::Path;

use crate::workspace::Package;

/// Resolve the package that owns `path`.
///
/// Containment is a prefix check on normalized (forward-slash) paths, with a
/// separator guard so `packages/ab` is not considered under `packages/a`.
///
/// The scan is sequential over the whole list with no short-circuit: when
/// package directories overlap, the **last** match in list order wins. The
/// package list produced by discovery is sorted outermost-first, so nested
/// packages resolve to the innermost owner.
///
/// Returns `None` when no package contains the path. Pure function, no
/// errors.
pub fn resolve_package<'a>(path: &Path, packages: &'a [Package]) -> Option<&'a Package> {
    let needle = normalized(path);

    let mut found = None;
    for pkg in packages {
        if contains(&normalized(&pkg.dir), &needle) {
            found = Some(pkg);
        }
    }
    found
}

fn normalized(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn contains(dir: &str, path: &str) -> bool {
    let dir = dir.trim_end_matches('/');
    if path == dir {
        return true;
    }
    path.strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with('/'))
}
