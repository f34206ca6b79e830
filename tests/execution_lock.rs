use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;

use pkgwatch::engine::{ExecutionLock, CHANGE_ACTION_LOCK};

#[tokio::test]
async fn bodies_never_overlap_and_run_in_arrival_order() {
    let lock = ExecutionLock::new(CHANGE_ACTION_LOCK);
    let trace: Arc<Mutex<Vec<String>>> = Arc::default();

    let mut handles = Vec::new();
    for i in 0..3 {
        let lock = lock.clone();
        let trace = Arc::clone(&trace);
        handles.push(tokio::spawn(async move {
            let _guard = lock.acquire().await;
            trace.lock().unwrap().push(format!("enter-{i}"));
            sleep(Duration::from_millis(30)).await;
            trace.lock().unwrap().push(format!("exit-{i}"));
        }));
        // Pin the arrival order.
        sleep(Duration::from_millis(5)).await;
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let trace = trace.lock().unwrap().clone();
    assert_eq!(
        trace,
        vec!["enter-0", "exit-0", "enter-1", "exit-1", "enter-2", "exit-2"]
    );
}

#[tokio::test]
async fn guard_drop_releases_the_lock() {
    // The guard releases on drop, so a failed body never wedges the lock.
    let lock = ExecutionLock::new("test");

    {
        let _guard = lock.acquire().await;
    }

    // A second acquisition must succeed promptly.
    let acquired = tokio::time::timeout(Duration::from_millis(100), lock.acquire()).await;
    assert!(acquired.is_ok());
    assert_eq!(lock.name(), "test");
}
