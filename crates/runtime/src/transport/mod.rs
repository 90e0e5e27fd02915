// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix-domain-datagram control and event transport.
//!
//! Sockets live in a per-user directory and are named `<unique-id><extension>`.
//! The extension partitions the namespace: `.api` (request/reply),
//! `.transition-listener`, `.output-listener`.

pub mod client;
pub mod server;

use std::path::{Path, PathBuf};

pub const EXT_API: &str = ".api";
pub const EXT_TRANSITION_LISTENER: &str = ".transition-listener";
pub const EXT_OUTPUT_LISTENER: &str = ".output-listener";

pub const PING: &[u8] = b"ping";
pub const PONG: &[u8] = b"pong";

/// Datagram payload cap. A recv that fills the buffer exactly is treated as
/// a truncated (too-large) payload.
pub const MAX_DATAGRAM: usize = 64 * 1024;

/// List every socket file under `dir` whose name ends with `extension`.
pub fn discover_sockets(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(extension)))
        .collect()
}

/// Build a fresh, unique socket path under `dir` with `extension`.
pub fn unique_socket_path(dir: &Path, extension: &str) -> PathBuf {
    dir.join(format!("sock-{}{extension}", oj_core::id::generate_sortable_tail()))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
