use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{advance, timeout};

use pkgwatch::watch::{spawn_debouncer, DebounceSettings};

fn settings(quiet_ms: u64, max_wait_ms: u64, leading: bool) -> DebounceSettings {
    DebounceSettings::from_millis(quiet_ms, max_wait_ms, leading)
}

#[tokio::test(start_paused = true)]
async fn burst_within_quiet_window_fires_once_with_last_payload() {
    let (tx, rx) = mpsc::channel::<String>(16);
    let (out_tx, mut out_rx) = mpsc::channel::<String>(16);
    let _task = spawn_debouncer(settings(2000, 3000, false), rx, out_tx);

    for i in 0..5 {
        tx.send(format!("path-{i}")).await.unwrap();
        advance(Duration::from_millis(50)).await;
    }

    let fired = out_rx.recv().await.unwrap();
    assert_eq!(fired, "path-4");

    // The burst is over; nothing else may fire.
    let more = timeout(Duration::from_millis(10_000), out_rx.recv()).await;
    assert!(more.is_err(), "unexpected second firing: {more:?}");
}

#[tokio::test(start_paused = true)]
async fn single_event_fires_after_quiet_window() {
    let (tx, rx) = mpsc::channel::<&'static str>(16);
    let (out_tx, mut out_rx) = mpsc::channel::<&'static str>(16);
    let _task = spawn_debouncer(settings(2000, 3000, false), rx, out_tx);

    tx.send("only").await.unwrap();

    let fired = out_rx.recv().await.unwrap();
    assert_eq!(fired, "only");
}

#[tokio::test(start_paused = true)]
async fn burst_outlasting_max_wait_fires_more_than_once() {
    let (tx, rx) = mpsc::channel::<String>(32);
    let (out_tx, mut out_rx) = mpsc::channel::<String>(32);
    let _task = spawn_debouncer(settings(2000, 3000, false), rx, out_tx);

    // Events every 500 ms for 4 seconds: the quiet window never elapses
    // between them, so only the max-wait ceiling can fire.
    for i in 0..9 {
        tx.send(format!("path-{i}")).await.unwrap();
        advance(Duration::from_millis(500)).await;
    }
    drop(tx);

    let mut fired = Vec::new();
    while let Some(payload) = out_rx.recv().await {
        fired.push(payload);
    }

    assert!(
        fired.len() >= 2,
        "expected the max-wait ceiling to split the burst, got {fired:?}"
    );
    assert_eq!(fired.last().unwrap(), "path-8");
}

#[tokio::test(start_paused = true)]
async fn leading_mode_fires_immediately_on_first_event() {
    let (tx, rx) = mpsc::channel::<&'static str>(16);
    let (out_tx, mut out_rx) = mpsc::channel::<&'static str>(16);
    let _task = spawn_debouncer(settings(2000, 3000, true), rx, out_tx);

    tx.send("first").await.unwrap();

    // No timer needs to expire for the leading fire.
    let fired = timeout(Duration::from_millis(100), out_rx.recv())
        .await
        .expect("leading fire should not wait for the quiet window")
        .unwrap();
    assert_eq!(fired, "first");

    // A lone event produces no trailing fire.
    let more = timeout(Duration::from_millis(10_000), out_rx.recv()).await;
    assert!(more.is_err());
}

#[tokio::test(start_paused = true)]
async fn leading_mode_burst_adds_one_trailing_fire_with_last_payload() {
    let (tx, rx) = mpsc::channel::<String>(16);
    let (out_tx, mut out_rx) = mpsc::channel::<String>(16);
    let _task = spawn_debouncer(settings(2000, 3000, true), rx, out_tx);

    for i in 0..3 {
        tx.send(format!("path-{i}")).await.unwrap();
        advance(Duration::from_millis(50)).await;
    }

    assert_eq!(out_rx.recv().await.unwrap(), "path-0");
    assert_eq!(out_rx.recv().await.unwrap(), "path-2");

    let more = timeout(Duration::from_millis(10_000), out_rx.recv()).await;
    assert!(more.is_err());
}

#[tokio::test(start_paused = true)]
async fn closing_the_input_flushes_the_pending_payload() {
    let (tx, rx) = mpsc::channel::<&'static str>(16);
    let (out_tx, mut out_rx) = mpsc::channel::<&'static str>(16);
    let task = spawn_debouncer(settings(2000, 3000, false), rx, out_tx);

    tx.send("pending").await.unwrap();
    drop(tx);

    assert_eq!(out_rx.recv().await.unwrap(), "pending");
    assert!(out_rx.recv().await.is_none());
    task.await.unwrap();
}
