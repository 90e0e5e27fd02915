// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `{request_metadata: {api, instance_match?}, ...}` request envelope.

use crate::error::ProtocolError;
use oj_core::InstanceMatchCriteria;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub api: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_match: Option<InstanceMatchCriteria>,
}

/// A request datagram, decoded in two steps: first the envelope (to resolve
/// the resource and apply the instance filter), then the resource-specific
/// fields out of `fields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRequestEnvelope {
    pub request_metadata: RequestMetadata,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl ApiRequestEnvelope {
    pub fn parse(body: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(body).map_err(|e| ProtocolError::MalformedJson(e.to_string()))
    }

    /// Decode a resource-specific body out of the envelope's extra fields.
    pub fn fields_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_value(serde_json::Value::Object(self.fields.clone()))
            .map_err(|e| ProtocolError::InvalidField(e.to_string()))
    }

    pub fn instance_match(&self) -> InstanceMatchCriteria {
        self.request_metadata.instance_match.clone().unwrap_or_default()
    }
}

/// `/jobs/release/waiting` request fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseWaitingFields {
    pub waiting_state: oj_core::RunState,
}

/// `/jobs/release/pending` request fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleasePendingFields {
    pub pending_group: String,
}

/// `/jobs/tail` request fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailFields {
    #[serde(default = "default_tail_lines")]
    pub lines: usize,
}

fn default_tail_lines() -> usize {
    100
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
