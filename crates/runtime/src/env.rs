// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the runtime crate.

use crate::error::RuntimeError;
use std::path::PathBuf;
use std::time::Duration;

/// Resolve state directory: `OJ_STATE_DIR` > `XDG_STATE_HOME/oj` > `~/.local/state/oj`.
pub fn state_dir() -> Result<PathBuf, RuntimeError> {
    if let Ok(dir) = std::env::var("OJ_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("oj"));
    }
    let home = dirs::home_dir().ok_or(RuntimeError::NoStateDir)?;
    Ok(home.join(".local/state/oj"))
}

/// Directory holding every process's control/event sockets:
/// `OJ_SOCKET_DIR` overrides the default `<state_dir>/sockets`.
pub fn socket_dir() -> Result<PathBuf, RuntimeError> {
    if let Ok(dir) = std::env::var("OJ_SOCKET_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(state_dir()?.join("sockets"))
}

/// Round-trip timeout for a control request.
pub fn ipc_timeout() -> Duration {
    std::env::var("OJ_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Host lock acquisition timeout before giving up with `HostLockError::TimedOut`.
pub fn host_lock_timeout() -> Duration {
    std::env::var("OJ_HOST_LOCK_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(10))
}

/// Poll interval used by coordination phases (approval/no-overlap/dependency/
/// waiting/queue) between checks. Override for faster tests.
pub fn poll_interval() -> Duration {
    std::env::var("OJ_POLL_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(200))
}

/// Number of output lines retained per job instance for `jobs/tail`.
pub fn output_buffer_lines() -> usize {
    std::env::var("OJ_OUTPUT_BUFFER_LINES").ok().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1000)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
