// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Datagram client: discovers sockets of a given extension and talks to
//! each independently. A socket that refuses a connection is memoized as
//! dead for the lifetime of this client instance; one that times out is
//! memoized separately, since a slow server may still be worth retrying
//! on a later sweep even though it isn't worth retrying within the same
//! broadcast. Both sets are skipped on subsequent requests.

use super::{discover_sockets, unique_socket_path, MAX_DATAGRAM, PING, PONG};
use crate::error::TransportError;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::UnixDatagram;

/// Per-server outcome of a request broadcast. A server that actively
/// refused the connection is recorded as dead and produces no outcome at
/// all; only a timeout is surfaced here.
#[derive(Debug, Clone)]
pub struct ServerOutcome {
    pub server_id: PathBuf,
    pub response: Option<Vec<u8>>,
    pub error: Option<ClientSocketError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSocketError {
    Timeout,
}

pub struct DatagramClient {
    socket: UnixDatagram,
    path: PathBuf,
    dead: Mutex<HashSet<PathBuf>>,
    timed_out: Mutex<HashSet<PathBuf>>,
    timeout: Duration,
}

impl DatagramClient {
    /// Bind an ephemeral reply socket under `reply_dir` using `extension`.
    pub fn bind(reply_dir: &Path, extension: &str, timeout: Duration) -> Result<Self, TransportError> {
        std::fs::create_dir_all(reply_dir)?;
        let path = unique_socket_path(reply_dir, extension);
        let socket = UnixDatagram::bind(&path)?;
        Ok(Self { socket, path, dead: Mutex::new(HashSet::new()), timed_out: Mutex::new(HashSet::new()), timeout })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Send `body` to `target` and wait for exactly one reply.
    async fn request_one(&self, target: &Path, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        if body.len() >= MAX_DATAGRAM {
            return Err(TransportError::PayloadTooLarge(body.len(), MAX_DATAGRAM));
        }
        if let Err(e) = self.socket.send_to(body, target).await {
            if e.kind() == std::io::ErrorKind::ConnectionRefused {
                self.dead.lock().insert(target.to_path_buf());
            }
            return Err(TransportError::Io(e));
        }
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let n = tokio::time::timeout(self.timeout, self.socket.recv(&mut buf)).await.map_err(|_| TransportError::Timeout)??;
        buf.truncate(n);
        Ok(buf)
    }

    /// Send `body` to every socket under `dir` with `extension` and collect
    /// the reply or timeout from each live one.
    pub async fn send_request(&self, dir: &Path, extension: &str, body: &[u8]) -> Vec<ServerOutcome> {
        let mut outcomes = Vec::new();
        for target in discover_sockets(dir, extension) {
            if self.dead.lock().contains(&target) || self.timed_out.lock().contains(&target) {
                continue;
            }
            match self.request_one(&target, body).await {
                Ok(response) => outcomes.push(ServerOutcome { server_id: target, response: Some(response), error: None }),
                Err(TransportError::Timeout) => {
                    self.timed_out.lock().insert(target.clone());
                    outcomes.push(ServerOutcome { server_id: target, response: None, error: Some(ClientSocketError::Timeout) })
                }
                Err(_) => {
                    // Connection refused (or any other send failure) marks the
                    // socket dead above; nothing to report for this attempt.
                }
            }
        }
        outcomes
    }

    /// Fire-and-forget broadcast to every socket with `extension`; no reply
    /// is awaited. Returns how many sends succeeded.
    pub async fn broadcast(&self, dir: &Path, extension: &str, body: &[u8]) -> usize {
        let mut sent = 0;
        for target in discover_sockets(dir, extension) {
            if self.dead.lock().contains(&target) {
                continue;
            }
            match self.socket.send_to(body, &target).await {
                Ok(_) => sent += 1,
                Err(_) => {
                    self.dead.lock().insert(target);
                }
            }
        }
        sent
    }

    /// Liveness probe against one socket.
    pub async fn ping(&self, target: &Path) -> bool {
        matches!(self.request_one(target, PING).await, Ok(body) if body == PONG)
    }

    /// Ping every discovered socket with `extension` and unlink the ones
    /// that don't answer. Returns the number removed.
    pub async fn sweep_stale_sockets(&self, dir: &Path, extension: &str) -> usize {
        let mut removed = 0;
        for target in discover_sockets(dir, extension) {
            if self.ping(&target).await {
                self.timed_out.lock().remove(&target);
            } else {
                if std::fs::remove_file(&target).is_ok() {
                    removed += 1;
                }
                self.dead.lock().remove(&target);
                self.timed_out.lock().remove(&target);
            }
        }
        removed
    }
}

impl Drop for DatagramClient {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
