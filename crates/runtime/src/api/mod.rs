// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-instance API server: resolves a request envelope to one of the
//! built-in resources, filters the registry by `instance_match`, and calls
//! the resource handler once per matching instance.

use crate::instance::{FetchMode, InstanceRegistry, JobInstanceRunner};
use oj_core::{InstanceMatchCriteria, RunState};
use oj_wire::request::{ApiRequestEnvelope, ReleasePendingFields, ReleaseWaitingFields, RequestMetadata, TailFields};
use oj_wire::response::{ApiResponseEnvelope, InstanceEntry};
use oj_wire::{resource, DispatchResultBody, ProtocolError, ReleasedBody, StopBody, TailBody, TailLine};
use serde::Serialize;

/// Handle one request datagram body, producing the response envelope to
/// serialize back to the caller. Never fails: every error path is encoded
/// as an error response rather than propagated to the transport layer.
pub fn dispatch(directory: &InstanceRegistry, body: &str) -> ApiResponseEnvelope<serde_json::Value> {
    match route(directory, body) {
        Ok(entries) => ApiResponseEnvelope::ok(entries),
        Err(e) => ApiResponseEnvelope::err(&e),
    }
}

fn route(directory: &InstanceRegistry, body: &str) -> Result<Vec<InstanceEntry<serde_json::Value>>, ProtocolError> {
    let envelope = parse_envelope(body)?;
    match envelope.request_metadata.api.as_str() {
        resource::JOBS => handle_jobs(directory, &envelope),
        resource::JOBS_RELEASE_WAITING => handle_release_waiting(directory, &envelope),
        resource::JOBS_RELEASE_PENDING => handle_release_pending(directory, &envelope),
        resource::JOBS_STOP => handle_stop(directory, &envelope),
        resource::JOBS_TAIL => handle_tail(directory, &envelope),
        resource::JOBS_SIGNAL_DISPATCH => handle_signal_dispatch(directory, &envelope),
        other => Err(ProtocolError::UnknownResource(other.to_string())),
    }
}

/// Parse in two steps so a malformed body (400) and a missing
/// `request_metadata` field (422) are distinguishable, per the spec.
fn parse_envelope(body: &str) -> Result<ApiRequestEnvelope, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| ProtocolError::MalformedJson(e.to_string()))?;
    let request_metadata_value =
        value.get("request_metadata").cloned().ok_or_else(|| ProtocolError::InvalidField("request_metadata".to_string()))?;
    let request_metadata: RequestMetadata =
        serde_json::from_value(request_metadata_value).map_err(|e| ProtocolError::InvalidField(e.to_string()))?;
    let fields = value.as_object().cloned().unwrap_or_default();
    Ok(ApiRequestEnvelope { request_metadata, fields })
}

fn entry<B: Serialize>(runner: &JobInstanceRunner, body: B) -> Result<InstanceEntry<serde_json::Value>, ProtocolError> {
    let body = serde_json::to_value(body).map_err(|_| ProtocolError::Unexpected)?;
    Ok(InstanceEntry { instance_metadata: runner.metadata().clone(), body })
}

fn require_non_empty(criteria: &InstanceMatchCriteria) -> Result<(), ProtocolError> {
    if *criteria == InstanceMatchCriteria::default() {
        return Err(ProtocolError::InvalidField("match criteria must not be empty".to_string()));
    }
    Ok(())
}

fn handle_jobs(directory: &InstanceRegistry, envelope: &ApiRequestEnvelope) -> Result<Vec<InstanceEntry<serde_json::Value>>, ProtocolError> {
    let criteria = envelope.instance_match();
    directory.matching(&criteria).iter().map(|r| entry(r, r.job_run_info())).collect()
}

fn handle_release_waiting(
    directory: &InstanceRegistry,
    envelope: &ApiRequestEnvelope,
) -> Result<Vec<InstanceEntry<serde_json::Value>>, ProtocolError> {
    let fields: ReleaseWaitingFields = envelope.fields_as()?;
    if !matches!(fields.waiting_state, RunState::Pending | RunState::Waiting) {
        return Err(ProtocolError::InvalidField(format!("{} does not carry the WAITING flag", fields.waiting_state)));
    }
    let criteria = envelope.instance_match();
    directory
        .matching(&criteria)
        .iter()
        .map(|r| {
            let released = r.current_run_state() == fields.waiting_state && r.release_waiting(fields.waiting_state);
            entry(r, ReleasedBody { released })
        })
        .collect()
}

fn handle_release_pending(
    directory: &InstanceRegistry,
    envelope: &ApiRequestEnvelope,
) -> Result<Vec<InstanceEntry<serde_json::Value>>, ProtocolError> {
    let fields: ReleasePendingFields = envelope.fields_as()?;
    let criteria = envelope.instance_match();
    directory
        .matching(&criteria)
        .iter()
        .map(|r| entry(r, ReleasedBody { released: r.release_pending(&fields.pending_group) }))
        .collect()
}

fn handle_stop(directory: &InstanceRegistry, envelope: &ApiRequestEnvelope) -> Result<Vec<InstanceEntry<serde_json::Value>>, ProtocolError> {
    let criteria = envelope.instance_match();
    require_non_empty(&criteria)?;
    directory
        .matching(&criteria)
        .iter()
        .map(|r| {
            r.stop();
            entry(r, StopBody { result: "stop_performed".to_string() })
        })
        .collect()
}

fn handle_tail(directory: &InstanceRegistry, envelope: &ApiRequestEnvelope) -> Result<Vec<InstanceEntry<serde_json::Value>>, ProtocolError> {
    let fields: TailFields = envelope.fields_as()?;
    let criteria = envelope.instance_match();
    directory
        .matching(&criteria)
        .iter()
        .map(|r| {
            let lines = r.fetch_output(FetchMode::Tail, fields.lines).into_iter().map(|(text, is_error)| TailLine { text, is_error }).collect();
            entry(r, TailBody { lines })
        })
        .collect()
}

fn handle_signal_dispatch(
    directory: &InstanceRegistry,
    envelope: &ApiRequestEnvelope,
) -> Result<Vec<InstanceEntry<serde_json::Value>>, ProtocolError> {
    let criteria = envelope.instance_match();
    directory
        .matching(&criteria)
        .iter()
        .map(|r| {
            let outcome = r.signal_dispatch();
            entry(r, DispatchResultBody { waiter_found: outcome.waiter_found, executed: outcome.executed })
        })
        .collect()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
