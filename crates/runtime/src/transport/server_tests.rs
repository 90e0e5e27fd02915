// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;
use tokio::net::UnixDatagram;

#[tokio::test]
async fn ping_is_answered_with_pong_and_not_surfaced_as_a_request() {
    let dir = tempdir().unwrap();
    let server_path = dir.path().join("a.api");
    let server = DatagramServer::bind(server_path.clone(), true).unwrap();

    let client_path = dir.path().join("client.reply");
    let client = UnixDatagram::bind(&client_path).unwrap();
    client.send_to(PING, &server_path).unwrap();

    let result = server.recv().await.unwrap();
    assert!(result.is_none());

    let mut buf = [0u8; 16];
    let (n, _) = client.recv_from(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], PONG);
}

#[tokio::test]
async fn a_real_request_is_surfaced_with_its_reply_address() {
    let dir = tempdir().unwrap();
    let server_path = dir.path().join("a.api");
    let server = DatagramServer::bind(server_path.clone(), true).unwrap();

    let client_path = dir.path().join("client.reply");
    let client = UnixDatagram::bind(&client_path).unwrap();
    client.send_to(b"hello", &server_path).unwrap();

    let datagram = server.recv().await.unwrap().unwrap();
    assert_eq!(datagram.body, b"hello");
    assert_eq!(datagram.reply_to, client_path);

    server.reply(&datagram.reply_to, b"world").await.unwrap();
    let mut buf = [0u8; 16];
    let (n, _) = client.recv_from(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"world");
}

#[tokio::test]
async fn reply_rejects_an_oversized_payload() {
    let dir = tempdir().unwrap();
    let server = DatagramServer::bind(dir.path().join("a.api"), false).unwrap();
    let huge = vec![0u8; MAX_DATAGRAM];
    let err = server.reply(dir.path(), &huge).await.unwrap_err();
    assert!(matches!(err, TransportError::PayloadTooLarge(_, _)));
}

#[tokio::test]
async fn dropping_the_server_unlinks_its_socket_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.api");
    let server = DatagramServer::bind(path.clone(), false).unwrap();
    assert!(path.exists());
    drop(server);
    assert!(!path.exists());
}

#[tokio::test]
async fn bind_removes_a_stale_socket_file_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.api");
    std::fs::write(&path, b"stale").unwrap();
    let server = DatagramServer::bind(path.clone(), false).unwrap();
    assert_eq!(server.path(), path);
}
