// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `{response_metadata: {code, error?}, instances: [...]}` response envelope.

use crate::error::{ApiErrorBody, ProtocolError};
use oj_core::JobInstanceMetadata;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

/// One entry in a success response's `instances` array: the instance's
/// metadata plus whatever resource-specific body the handler produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceEntry<B> {
    pub instance_metadata: JobInstanceMetadata,
    #[serde(flatten)]
    pub body: B,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponseEnvelope<B = serde_json::Value> {
    pub response_metadata: ResponseMetadata,
    #[serde(default)]
    pub instances: Vec<InstanceEntry<B>>,
}

impl<B> ApiResponseEnvelope<B> {
    pub fn ok(instances: Vec<InstanceEntry<B>>) -> Self {
        Self { response_metadata: ResponseMetadata { code: 200, error: None }, instances }
    }

    pub fn err(error: &ProtocolError) -> ApiResponseEnvelope<serde_json::Value> {
        ApiResponseEnvelope {
            response_metadata: ResponseMetadata { code: error.code().as_u16(), error: Some(error.into()) },
            instances: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.response_metadata.code == 200
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
