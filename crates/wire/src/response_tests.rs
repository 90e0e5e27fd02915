// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::ProtocolError;
use oj_core::JobInstanceMetadata;
use serde_json::json;

#[test]
fn ok_response_serializes_without_error_field() {
    let entry = InstanceEntry { instance_metadata: JobInstanceMetadata::builder().build(), body: json!({"released": true}) };
    let resp = ApiResponseEnvelope::ok(vec![entry]);
    let value = serde_json::to_value(&resp).unwrap();
    assert_eq!(value["response_metadata"]["code"], 200);
    assert!(value["response_metadata"].get("error").is_none());
    assert_eq!(value["instances"][0]["released"], true);
}

#[test]
fn err_response_carries_reason_and_code() {
    let resp = ApiResponseEnvelope::<serde_json::Value>::err(&ProtocolError::UnknownResource("/nope".into()));
    assert_eq!(resp.response_metadata.code, 404);
    assert_eq!(resp.response_metadata.error.unwrap().reason, "unknown resource: /nope");
    assert!(resp.instances.is_empty());
}

#[test]
fn is_ok_reflects_200_code() {
    let ok = ApiResponseEnvelope::<serde_json::Value>::ok(Vec::new());
    assert!(ok.is_ok());
    let err = ApiResponseEnvelope::<serde_json::Value>::err(&ProtocolError::Unexpected);
    assert!(!err.is_ok());
}
