// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Datagram server: binds one Unix datagram socket, receives whole-datagram
//! requests, and replies to the sender's address.

use super::{MAX_DATAGRAM, PING, PONG};
use crate::error::TransportError;
use std::path::{Path, PathBuf};
use tokio::net::UnixDatagram;

/// One received datagram and the path to reply to.
pub struct Datagram {
    pub body: Vec<u8>,
    pub reply_to: PathBuf,
}

/// A bound `SOCK_DGRAM` Unix socket. Unlinks its own socket file on drop.
pub struct DatagramServer {
    socket: UnixDatagram,
    path: PathBuf,
    allow_ping: bool,
}

impl DatagramServer {
    /// Bind at `path`, removing any stale socket file left by a crashed
    /// process first.
    pub fn bind(path: PathBuf, allow_ping: bool) -> Result<Self, TransportError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        let socket = UnixDatagram::bind(&path)?;
        Ok(Self { socket, path, allow_ping })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Receive one datagram, transparently answering `ping` with `pong`
    /// when `allow_ping` is set. Returns `Ok(None)` for a consumed ping.
    pub async fn recv(&self) -> Result<Option<Datagram>, TransportError> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let (n, addr) = self.socket.recv_from(&mut buf).await?;
        if n == MAX_DATAGRAM {
            return Err(TransportError::PayloadTooLarge(n, MAX_DATAGRAM));
        }
        buf.truncate(n);
        let reply_to = addr.as_pathname().map(PathBuf::from).ok_or(TransportError::AnonymousSender)?;

        if self.allow_ping && buf == PING {
            let _ = self.socket.send_to(PONG, &reply_to).await;
            return Ok(None);
        }
        Ok(Some(Datagram { body: buf, reply_to }))
    }

    pub async fn reply(&self, to: &Path, body: &[u8]) -> Result<(), TransportError> {
        if body.len() >= MAX_DATAGRAM {
            return Err(TransportError::PayloadTooLarge(body.len(), MAX_DATAGRAM));
        }
        self.socket.send_to(body, to).await?;
        Ok(())
    }
}

impl Drop for DatagramServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
