// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `JobsClient`: the cross-process entry point coordination phases and
//! external tools use to query and act on job instances in this socket
//! namespace, without needing to know which process owns which instance.

use crate::error::TransportError;
use crate::transport::client::{ClientSocketError, DatagramClient};
use crate::transport::EXT_API;
use oj_core::{InstanceMatchCriteria, JobInstanceMetadata, RunState};
use oj_wire::request::{ReleasePendingFields, ReleaseWaitingFields, RequestMetadata, TailFields};
use oj_wire::response::ApiResponseEnvelope;
use oj_wire::{resource, DispatchResultBody, ReleasedBody, StopBody, TailBody};
use std::path::PathBuf;
use std::time::Duration;

/// How one server's reply to a request failed to produce a usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// The transport itself failed (timeout, refused connection).
    Socket,
    /// The server answered with a non-2xx `response_metadata.code`.
    Api,
    /// The reply body wasn't valid JSON, or lacked `response_metadata`.
    InvalidResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    pub server_id: PathBuf,
    pub kind: ClientErrorKind,
    pub detail: String,
}

pub struct JobsClient {
    client: DatagramClient,
    socket_dir: PathBuf,
}

impl JobsClient {
    pub fn new(socket_dir: PathBuf, timeout: Duration) -> Result<Self, TransportError> {
        let client = DatagramClient::bind(&socket_dir, ".client", timeout)?;
        Ok(Self { client, socket_dir })
    }

    /// Send one request to every `.api` server in the namespace, wrapping
    /// `fields` with `request_metadata`. Returns per-instance bodies
    /// flattened across every server that answered successfully, plus one
    /// error per server that didn't.
    pub async fn send_request(
        &self,
        api: &str,
        instance_match: Option<InstanceMatchCriteria>,
        fields: serde_json::Value,
    ) -> (Vec<(JobInstanceMetadata, serde_json::Value)>, Vec<ServerError>) {
        let mut body = match fields {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        let request_metadata = RequestMetadata { api: api.to_string(), instance_match };
        body.insert("request_metadata".to_string(), serde_json::to_value(request_metadata).unwrap_or_default());
        let request = serde_json::Value::Object(body).to_string();

        let outcomes = self.client.send_request(&self.socket_dir, EXT_API, request.as_bytes()).await;

        let mut instances = Vec::new();
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome.response {
                None => errors.push(ServerError {
                    server_id: outcome.server_id,
                    kind: ClientErrorKind::Socket,
                    detail: outcome.error.map(describe_socket_error).unwrap_or_else(|| "no response".to_string()),
                }),
                Some(raw) => match classify_response(&outcome.server_id, &raw) {
                    Ok(entries) => instances.extend(entries),
                    Err(error) => errors.push(error),
                },
            }
        }
        (instances, errors)
    }

    pub async fn read_instances(&self, instance_match: Option<InstanceMatchCriteria>) -> (Vec<(JobInstanceMetadata, serde_json::Value)>, Vec<ServerError>) {
        self.send_request(resource::JOBS, instance_match, serde_json::json!({})).await
    }

    pub async fn release_waiting_jobs(
        &self,
        instance_match: InstanceMatchCriteria,
        waiting_state: RunState,
    ) -> (Vec<(JobInstanceMetadata, ReleasedBody)>, Vec<ServerError>) {
        let fields = serde_json::to_value(ReleaseWaitingFields { waiting_state }).unwrap_or_default();
        self.typed_request(resource::JOBS_RELEASE_WAITING, Some(instance_match), fields).await
    }

    pub async fn release_pending_jobs(
        &self,
        pending_group: &str,
        instance_match: Option<InstanceMatchCriteria>,
    ) -> (Vec<(JobInstanceMetadata, ReleasedBody)>, Vec<ServerError>) {
        let fields = serde_json::to_value(ReleasePendingFields { pending_group: pending_group.to_string() }).unwrap_or_default();
        self.typed_request(resource::JOBS_RELEASE_PENDING, instance_match, fields).await
    }

    pub async fn stop_jobs(&self, instance_match: InstanceMatchCriteria) -> (Vec<(JobInstanceMetadata, StopBody)>, Vec<ServerError>) {
        self.typed_request(resource::JOBS_STOP, Some(instance_match), serde_json::json!({})).await
    }

    pub async fn read_tail(&self, instance_match: Option<InstanceMatchCriteria>, lines: usize) -> (Vec<(JobInstanceMetadata, TailBody)>, Vec<ServerError>) {
        let fields = serde_json::to_value(TailFields { lines }).unwrap_or_default();
        self.typed_request(resource::JOBS_TAIL, instance_match, fields).await
    }

    pub async fn signal_dispatch(&self, instance_match: InstanceMatchCriteria) -> (Vec<(JobInstanceMetadata, DispatchResultBody)>, Vec<ServerError>) {
        self.typed_request(resource::JOBS_SIGNAL_DISPATCH, Some(instance_match), serde_json::json!({})).await
    }

    async fn typed_request<T: serde::de::DeserializeOwned>(
        &self,
        api: &str,
        instance_match: Option<InstanceMatchCriteria>,
        fields: serde_json::Value,
    ) -> (Vec<(JobInstanceMetadata, T)>, Vec<ServerError>) {
        let (raw, mut errors) = self.send_request(api, instance_match, fields).await;
        let mut typed = Vec::new();
        for (metadata, value) in raw {
            match serde_json::from_value(value) {
                Ok(body) => typed.push((metadata, body)),
                Err(e) => errors.push(ServerError {
                    server_id: PathBuf::new(),
                    kind: ClientErrorKind::InvalidResponse,
                    detail: e.to_string(),
                }),
            }
        }
        (typed, errors)
    }
}

fn describe_socket_error(error: ClientSocketError) -> String {
    match error {
        ClientSocketError::Timeout => "request timed out".to_string(),
    }
}

fn classify_response(server_id: &std::path::Path, raw: &[u8]) -> Result<Vec<(JobInstanceMetadata, serde_json::Value)>, ServerError> {
    let envelope: ApiResponseEnvelope = serde_json::from_slice(raw).map_err(|e| ServerError {
        server_id: server_id.to_path_buf(),
        kind: ClientErrorKind::InvalidResponse,
        detail: e.to_string(),
    })?;
    if !envelope.is_ok() {
        let detail = envelope.response_metadata.error.map(|e| e.reason).unwrap_or_else(|| "unknown API error".to_string());
        return Err(ServerError { server_id: server_id.to_path_buf(), kind: ClientErrorKind::Api, detail });
    }
    Ok(envelope.instances.into_iter().map(|e| (e.instance_metadata, e.body)).collect())
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
