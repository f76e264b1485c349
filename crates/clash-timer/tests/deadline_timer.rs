//! Integration tests for the deadline timer.
//!
//! Uses `start_paused = true` so Tokio auto-advances the clock whenever
//! every task is idle; a 10 s deadline resolves instantly.

use std::time::Duration;

use clash_timer::{DeadlineTimer, FAR_FUTURE};
use tokio::sync::mpsc;
use tokio::time::timeout;

const DEADLINE: Duration = Duration::from_secs(10);

#[tokio::test(start_paused = true)]
async fn test_fires_at_deadline_not_before() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = DeadlineTimer::arm(DEADLINE, tx, 7u64);

    let early = timeout(Duration::from_secs(9), rx.recv()).await;
    assert!(early.is_err(), "timer must not fire before its deadline");

    let fired = rx.recv().await;
    assert_eq!(fired, Some(7));

    assert_eq!(timer.remaining(), Duration::ZERO);
    assert!(!timer.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_prevents_firing() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    // Keep a sender so the channel stays open and recv can only pend.
    let mut timer = DeadlineTimer::arm(DEADLINE, tx.clone(), 1u64);

    assert!(timer.cancel());
    assert!(timer.is_cancelled());

    let result = timeout(DEADLINE * 3, rx.recv()).await;
    assert!(result.is_err(), "cancelled timer must never fire");
    assert!(timer.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_is_idempotent() {
    let (tx, _rx) = mpsc::unbounded_channel::<u64>();
    let mut timer = DeadlineTimer::arm(DEADLINE, tx, 1);

    assert!(timer.cancel());
    assert!(!timer.cancel());
    assert!(!timer.cancel());
    assert!(timer.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = DeadlineTimer::arm(DEADLINE, tx.clone(), 1u64);
    drop(timer);

    let result = timeout(DEADLINE * 2, rx.recv()).await;
    assert!(result.is_err(), "dropped timer must never fire");
}

#[tokio::test(start_paused = true)]
async fn test_remaining_counts_down() {
    let (tx, _rx) = mpsc::unbounded_channel::<u64>();
    let timer = DeadlineTimer::arm(DEADLINE, tx, 1);

    assert_eq!(timer.remaining(), DEADLINE);

    tokio::time::advance(Duration::from_secs(4)).await;
    assert_eq!(timer.remaining(), Duration::from_secs(6));

    tokio::time::advance(Duration::from_secs(20)).await;
    assert_eq!(timer.remaining(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_receiver_is_harmless() {
    let (tx, rx) = mpsc::unbounded_channel::<u64>();
    let timer = DeadlineTimer::arm(Duration::from_millis(50), tx, 1);
    drop(rx);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(timer.remaining(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_independent_timers_fire_in_deadline_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _slow = DeadlineTimer::arm(Duration::from_secs(10), tx.clone(), "slow");
    let _fast = DeadlineTimer::arm(Duration::from_secs(3), tx.clone(), "fast");

    assert_eq!(rx.recv().await, Some("fast"));
    assert_eq!(rx.recv().await, Some("slow"));
}

#[tokio::test(start_paused = true)]
async fn test_unrepresentable_duration_is_capped() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = DeadlineTimer::arm(Duration::MAX, tx.clone(), 1u64);

    assert_eq!(timer.remaining(), FAR_FUTURE);

    let result = timeout(Duration::from_secs(3600), rx.recv()).await;
    assert!(result.is_err(), "capped timer must not fire early");
    assert!(!timer.is_cancelled());
}
