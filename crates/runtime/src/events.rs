// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event fan-out: dispatchers broadcast phase-transition and output events
//! to every discovered listener socket; receivers apply an optional
//! instance-id filter before handing events to local observers.

use crate::error::TransportError;
use crate::transport::client::DatagramClient;
use crate::transport::server::DatagramServer;
use crate::transport::{EXT_OUTPUT_LISTENER, EXT_TRANSITION_LISTENER};
use oj_core::{InstanceMatchCriteria, JobInstanceMetadata, PhaseMetadata};
use oj_wire::event::{EventEnvelope, OutputEvent, TransitionEvent};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Broadcasts events to every listener socket of a given extension. Binds
/// its own ephemeral socket under a dedicated `.dispatcher` namespace since
/// it never expects a reply.
pub struct EventDispatcher {
    client: DatagramClient,
    socket_dir: PathBuf,
    listener_extension: &'static str,
}

impl EventDispatcher {
    pub fn transition(socket_dir: PathBuf) -> Result<Self, TransportError> {
        Self::new(socket_dir, EXT_TRANSITION_LISTENER)
    }

    pub fn output(socket_dir: PathBuf) -> Result<Self, TransportError> {
        Self::new(socket_dir, EXT_OUTPUT_LISTENER)
    }

    fn new(socket_dir: PathBuf, listener_extension: &'static str) -> Result<Self, TransportError> {
        let client = DatagramClient::bind(&socket_dir, ".dispatcher", Duration::from_millis(0))?;
        Ok(Self { client, socket_dir, listener_extension })
    }

    pub async fn dispatch_transition(&self, instance_metadata: &JobInstanceMetadata, event: TransitionEvent) -> usize {
        self.broadcast(&EventEnvelope::transition(instance_metadata.clone(), event)).await
    }

    pub async fn dispatch_output(&self, instance_metadata: &JobInstanceMetadata, phase: &PhaseMetadata, line: &str, is_error: bool) -> usize {
        self.broadcast(&EventEnvelope::output(instance_metadata.clone(), phase.clone(), line, is_error)).await
    }

    async fn broadcast<E: serde::Serialize>(&self, envelope: &E) -> usize {
        let body = match serde_json::to_vec(envelope) {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%error, "event=[event_serialize_failed]");
                return 0;
            }
        };
        self.client.broadcast(&self.socket_dir, self.listener_extension, &body).await
    }
}

/// A bound listener socket for one event channel. Callers loop on
/// `recv_transition`/`recv_output` themselves, the same way they would loop
/// on a [`DatagramServer`].
pub struct EventReceiver {
    server: DatagramServer,
    id_filter: Option<InstanceMatchCriteria>,
}

impl EventReceiver {
    pub fn bind(path: PathBuf, id_filter: Option<InstanceMatchCriteria>) -> Result<Self, TransportError> {
        Ok(Self { server: DatagramServer::bind(path, false)?, id_filter })
    }

    pub fn path(&self) -> &Path {
        self.server.path()
    }

    pub async fn recv_transition(&self) -> Result<Option<EventEnvelope<TransitionEvent>>, TransportError> {
        self.recv().await
    }

    pub async fn recv_output(&self) -> Result<Option<EventEnvelope<OutputEvent>>, TransportError> {
        self.recv().await
    }

    async fn recv<E: serde::de::DeserializeOwned>(&self) -> Result<Option<EventEnvelope<E>>, TransportError> {
        let Some(datagram) = self.server.recv().await? else { return Ok(None) };
        let envelope: EventEnvelope<E> = match serde_json::from_slice(&datagram.body) {
            Ok(envelope) => envelope,
            Err(error) => {
                tracing::warn!(%error, "event=[event_deserialize_failed]");
                return Ok(None);
            }
        };
        if let Some(filter) = &self.id_filter {
            if !filter.matches_id(&envelope.instance_metadata.id) {
                return Ok(None);
            }
        }
        Ok(Some(envelope))
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
