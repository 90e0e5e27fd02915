// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ojd`: bootstraps the ambient stack (config, logging), binds this
//! process's control and event sockets, and serves the instance registry
//! until interrupted.
//!
//! Job submission and phase wiring are an embedding concern (a CLI, a
//! scheduler) that lives outside this crate; this binary only hosts the
//! runtime surface an embedder drives. It registers nothing into the
//! registry on its own, so out of the box it idles, answering `/jobs`
//! with an empty list.

use oj_runtime::api;
use oj_runtime::instance::InstanceRegistry;
use oj_runtime::transport::server::DatagramServer;
use oj_runtime::transport::{unique_socket_path, EXT_API};
use oj_runtime::RuntimeConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RuntimeConfig::from_env()?.with_file_overrides(&default_config_path())?;
    let _logging_guard = oj_runtime::logging::init(&config.state_dir.join("logs"))?;

    tracing::info!(
        state_dir = %config.state_dir.display(),
        socket_dir = %config.socket_dir.display(),
        "event=[runtime_starting]"
    );

    std::fs::create_dir_all(&config.socket_dir)?;
    let registry = Arc::new(InstanceRegistry::new());

    let api_socket_path = unique_socket_path(&config.socket_dir, EXT_API);
    let api_server = DatagramServer::bind(api_socket_path, true)?;
    tracing::info!(path = %api_server.path().display(), "event=[api_server_bound]");

    let serve_registry = registry.clone();
    let serve = tokio::spawn(async move {
        loop {
            match api_server.recv().await {
                Ok(Some(datagram)) => {
                    let body = match std::str::from_utf8(&datagram.body) {
                        Ok(body) => body,
                        Err(_) => continue,
                    };
                    let response = api::dispatch(&serve_registry, body);
                    let reply = serde_json::to_vec(&response).unwrap_or_default();
                    let _ = api_server.reply(&datagram.reply_to, &reply).await;
                }
                Ok(None) => continue,
                Err(error) => {
                    tracing::warn!(%error, "event=[api_server_recv_failed]");
                }
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("event=[runtime_shutdown_requested]");
        }
        result = serve => {
            if let Err(error) = result {
                tracing::error!(%error, "event=[api_server_task_panicked]");
            }
        }
    }

    Ok(())
}

/// Optional TOML overlay, conventionally next to the state directory.
/// Absence is not an error; see `RuntimeConfig::with_file_overrides`.
fn default_config_path() -> std::path::PathBuf {
    std::env::var("OJ_CONFIG_FILE")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("/etc/oj/runtime.toml"))
}
