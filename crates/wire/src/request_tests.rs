// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parse_decodes_metadata_and_keeps_extra_fields() {
    let body = r#"{"request_metadata":{"api":"/jobs/tail"},"lines":50}"#;
    let envelope = ApiRequestEnvelope::parse(body).unwrap();
    assert_eq!(envelope.request_metadata.api, "/jobs/tail");
    let fields: TailFields = envelope.fields_as().unwrap();
    assert_eq!(fields.lines, 50);
}

#[test]
fn tail_fields_default_when_omitted() {
    let body = r#"{"request_metadata":{"api":"/jobs/tail"}}"#;
    let envelope = ApiRequestEnvelope::parse(body).unwrap();
    let fields: TailFields = envelope.fields_as().unwrap();
    assert_eq!(fields.lines, 100);
}

#[test]
fn malformed_json_is_a_protocol_error() {
    let err = ApiRequestEnvelope::parse("{not json").unwrap_err();
    assert_eq!(err.code().as_u16(), 400);
}

#[test]
fn missing_instance_match_defaults_to_match_all() {
    let body = r#"{"request_metadata":{"api":"/jobs"}}"#;
    let envelope = ApiRequestEnvelope::parse(body).unwrap();
    assert_eq!(envelope.instance_match(), InstanceMatchCriteria::default());
}
