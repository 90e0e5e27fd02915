// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime-level error taxonomy: startup, host lock, transport, and API
//! dispatch failures.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that can occur bringing a process up or tearing it down.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to acquire host lock: {0}")]
    HostLock(#[from] HostLockError),

    #[error("failed to bind control socket at {0}: {1}")]
    BindFailed(PathBuf, #[source] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures acquiring the advisory host lock that serializes
/// inspect-then-decide windows across processes on one host.
#[derive(Debug, Error)]
pub enum HostLockError {
    #[error("failed to open lock file {0}: {1}")]
    Open(PathBuf, #[source] std::io::Error),

    #[error("timed out after {0:?} waiting for the host lock")]
    TimedOut(std::time::Duration),

    #[error("io error while holding the host lock: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures from the Unix-domain-datagram control/event transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request timed out")]
    Timeout,

    #[error("payload of {0} bytes exceeds the {1}-byte limit")]
    PayloadTooLarge(usize, usize),

    #[error("peer sent a datagram from an unnamed (unbound) socket")]
    AnonymousSender,

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Failures loading runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
