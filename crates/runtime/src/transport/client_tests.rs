// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::transport::server::DatagramServer;
use tempfile::tempdir;

async fn echo_server(server: DatagramServer) {
    tokio::spawn(async move {
        while let Ok(Some(datagram)) = server.recv().await {
            let _ = server.reply(&datagram.reply_to, &datagram.body).await;
        }
    });
}

#[tokio::test]
async fn send_request_collects_a_reply_from_each_live_server() {
    let dir = tempdir().unwrap();
    let server = DatagramServer::bind(dir.path().join("one.api"), false).unwrap();
    echo_server(server).await;

    let client = DatagramClient::bind(dir.path(), ".reply", Duration::from_millis(500)).unwrap();
    let outcomes = client.send_request(dir.path(), ".api", b"hi").await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].response.as_deref(), Some(&b"hi"[..]));
    assert!(outcomes[0].error.is_none());
}

#[tokio::test]
async fn send_request_reports_timeout_for_a_nonresponsive_server() {
    let dir = tempdir().unwrap();
    let _server = DatagramServer::bind(dir.path().join("silent.api"), false).unwrap();

    let client = DatagramClient::bind(dir.path(), ".reply", Duration::from_millis(50)).unwrap();
    let outcomes = client.send_request(dir.path(), ".api", b"hi").await;

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].response.is_none());
    assert_eq!(outcomes[0].error, Some(ClientSocketError::Timeout));
}

#[tokio::test]
async fn ping_succeeds_against_a_ping_enabled_server() {
    let dir = tempdir().unwrap();
    let server_path = dir.path().join("a.api");
    let server = DatagramServer::bind(server_path.clone(), true).unwrap();
    tokio::spawn(async move {
        let _ = server.recv().await;
    });

    let client = DatagramClient::bind(dir.path(), ".reply", Duration::from_millis(500)).unwrap();
    assert!(client.ping(&server_path).await);
}

#[tokio::test]
async fn sweep_stale_sockets_removes_unresponsive_files() {
    let dir = tempdir().unwrap();
    let dead_path = dir.path().join("dead.api");
    std::fs::write(&dead_path, b"").unwrap();

    let client = DatagramClient::bind(dir.path(), ".reply", Duration::from_millis(50)).unwrap();
    let removed = client.sweep_stale_sockets(dir.path(), ".api").await;

    assert_eq!(removed, 1);
    assert!(!dead_path.exists());
}

#[tokio::test]
async fn a_timed_out_server_is_not_retried_within_the_same_request() {
    let dir = tempdir().unwrap();
    let _server = DatagramServer::bind(dir.path().join("silent.api"), false).unwrap();

    let client = DatagramClient::bind(dir.path(), ".reply", Duration::from_millis(50)).unwrap();
    let first = client.send_request(dir.path(), ".api", b"hi").await;
    assert_eq!(first.len(), 1);

    let second = client.send_request(dir.path(), ".api", b"hi").await;
    assert!(second.is_empty(), "a timed-out server is memoized and skipped on the next request from the same client");
}

#[tokio::test]
async fn broadcast_counts_only_successful_sends() {
    let dir = tempdir().unwrap();
    let server = DatagramServer::bind(dir.path().join("a.transition-listener"), false).unwrap();
    tokio::spawn(async move {
        let _ = server.recv().await;
    });

    let client = DatagramClient::bind(dir.path(), ".reply", Duration::from_millis(500)).unwrap();
    let sent = client.broadcast(dir.path(), ".transition-listener", b"evt").await;
    assert_eq!(sent, 1);
}
