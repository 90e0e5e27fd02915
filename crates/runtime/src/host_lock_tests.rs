// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn acquire_succeeds_when_uncontended() {
    let dir = tempdir().unwrap();
    let lock = HostLock::new(dir.path().join("state0.lock"));
    let guard = lock.acquire(Duration::from_secs(1)).await.unwrap();
    drop(guard);
}

#[tokio::test]
async fn second_acquire_waits_for_the_first_to_drop() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state0.lock");
    let lock = HostLock::new(path);

    let first = lock.acquire(Duration::from_secs(1)).await.unwrap();
    let lock2 = lock.clone();
    let waiter = tokio::spawn(async move { lock2.acquire(Duration::from_secs(2)).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(first);

    waiter.await.unwrap().unwrap();
}

#[tokio::test]
async fn acquire_times_out_when_held_too_long() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state0.lock");
    let lock = HostLock::new(path);

    let _held = lock.acquire(Duration::from_secs(5)).await.unwrap();
    let err = lock.acquire(Duration::from_millis(80)).await.unwrap_err();
    assert!(matches!(err, HostLockError::TimedOut(_)));
}

#[test]
fn jittered_backoff_stays_within_bounds() {
    for attempt in 0..20 {
        let d = jittered_backoff(attempt, Duration::from_millis(50));
        assert!(d >= Duration::from_millis(10));
        assert!(d <= Duration::from_millis(50));
    }
}
