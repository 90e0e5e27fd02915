// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `{event_metadata: {event_type}, instance_metadata, event}` fan-out
//! envelope shared by the phase-transition and output channels.

use oj_core::{JobInstanceMetadata, JobRun, PhaseMetadata, PhaseRun};
use serde::{Deserialize, Serialize};

/// Output lines are truncated to this many characters before dispatch.
pub const OUTPUT_TRUNCATE_LEN: usize = 10_000;
const TRUNCATION_SUFFIX: &str = ".. (truncated)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Transition,
    Output,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_type: EventType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    pub event_metadata: EventMetadata,
    pub instance_metadata: JobInstanceMetadata,
    pub event: E,
}

/// One message per phase transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub previous_phase: Option<PhaseRun>,
    pub new_phase: PhaseRun,
    pub ordinal: usize,
    pub job_run: JobRun,
}

impl EventEnvelope<TransitionEvent> {
    pub fn transition(instance_metadata: JobInstanceMetadata, event: TransitionEvent) -> Self {
        Self { event_metadata: EventMetadata { event_type: EventType::Transition }, instance_metadata, event }
    }
}

/// One message per produced output line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputEvent {
    pub phase: PhaseMetadata,
    pub output: String,
    pub is_error: bool,
}

impl EventEnvelope<OutputEvent> {
    pub fn output(instance_metadata: JobInstanceMetadata, phase: PhaseMetadata, line: &str, is_error: bool) -> Self {
        Self {
            event_metadata: EventMetadata { event_type: EventType::Output },
            instance_metadata,
            event: OutputEvent { phase, output: truncate_output(line), is_error },
        }
    }
}

/// Truncate `text` to [`OUTPUT_TRUNCATE_LEN`] characters, appending the
/// truncation suffix marker when it was cut.
pub fn truncate_output(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count <= OUTPUT_TRUNCATE_LEN {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(OUTPUT_TRUNCATE_LEN).collect();
    truncated.push_str(TRUNCATION_SUFFIX);
    truncated
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
