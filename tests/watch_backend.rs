use std::error::Error;
use std::fs;

use tokio::sync::mpsc;

use pkgwatch::watch::{spawn_watcher, WatchBackend, WatchFilter};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn register_and_unregister_are_idempotent() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let file = tmp.path().join("a.txt");
    fs::write(&file, "x")?;

    let filter = WatchFilter::compile(&["**/*".to_string()], &[])?;
    let (tx, _rx) = mpsc::channel(16);
    let mut backend = spawn_watcher(tmp.path(), filter, None, tx)?;

    backend.register(&file)?;
    backend.register(&file)?; // double-add is a no-op

    backend.unregister(&file)?;
    backend.unregister(&file)?; // double-remove is a no-op

    // Removing a path that was never registered is fine too.
    backend.unregister(&tmp.path().join("never-seen.txt"))?;

    Ok(())
}

#[test]
fn filter_combines_include_and_ignore_rules() -> TestResult {
    let filter = WatchFilter::compile(
        &["**/*.rs".to_string()],
        &["**/target/**".to_string()],
    )?;

    assert!(filter.matches("packages/pkg-a/src/lib.rs"));
    assert!(!filter.matches("packages/pkg-a/notes.md"));
    assert!(!filter.matches("packages/pkg-a/target/debug/build.rs"));

    Ok(())
}
