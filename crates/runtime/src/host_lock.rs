// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide advisory file lock used to make a coordination phase's
//! "inspect the set of active instances, then decide" window atomic across
//! every process on the host.

use crate::error::HostLockError;
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A single lock file, shared by every coordination phase on the host that
/// needs an atomic inspect-then-decide window.
#[derive(Clone)]
pub struct HostLock {
    path: PathBuf,
}

impl HostLock {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Block (without tying up the async runtime) until the lock is held or
    /// `timeout` elapses, retrying with jittered back-off between attempts.
    pub async fn acquire(&self, timeout: Duration) -> Result<HostLockGuard, HostLockError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || acquire_blocking(&path, timeout))
            .await
            .unwrap_or_else(|e| Err(HostLockError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))))
    }
}

fn acquire_blocking(path: &Path, timeout: Duration) -> Result<HostLockGuard, HostLockError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(HostLockError::Io)?;
    }
    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| HostLockError::Open(path.to_path_buf(), e))?;

    let deadline = Instant::now() + timeout;
    let mut attempt: u32 = 0;
    loop {
        match file.try_lock_exclusive() {
            Ok(()) => return Ok(HostLockGuard { file }),
            Err(_) if Instant::now() >= deadline => return Err(HostLockError::TimedOut(timeout)),
            Err(_) => {
                std::thread::sleep(jittered_backoff(attempt, timeout));
                attempt += 1;
            }
        }
    }
}

/// Randomised back-off between 10ms and `max_check_time`, so concurrent
/// waiters don't all retry in lockstep.
fn jittered_backoff(attempt: u32, max_check_time: Duration) -> Duration {
    let max_ms = (max_check_time.as_millis() as u64).max(10);
    let span = max_ms.saturating_sub(10).max(1);
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.subsec_nanos()).unwrap_or(0) as u64;
    let jitter = (nanos.wrapping_add(attempt as u64 * 2654435761)) % span;
    Duration::from_millis(10 + jitter)
}

/// Held while the lock is owned. Unlocked automatically on drop.
pub struct HostLockGuard {
    file: File,
}

impl Drop for HostLockGuard {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
#[path = "host_lock_tests.rs"]
mod tests;
