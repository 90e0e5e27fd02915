// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The serialisable instance snapshot exposed over the API and dispatched
//! in phase-transition events.

use crate::lifecycle::{Lifecycle, PhaseMetadata};
use crate::metadata::JobInstanceMetadata;
use crate::termination::TerminationInfo;
use serde::{Deserialize, Serialize};

/// Immutable tuple returned atomically by the Phaser's transition lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub phases: Vec<PhaseMetadata>,
    pub lifecycle: Lifecycle,
    pub termination: Option<TerminationInfo>,
}

impl RunSnapshot {
    pub fn new(phases: Vec<PhaseMetadata>, lifecycle: Lifecycle, termination: Option<TerminationInfo>) -> Self {
        Self { phases, lifecycle, termination }
    }
}

/// Fine-grained progress reporting for a phase body. No standard phase
/// populates this today; it exists so a custom phase can surface activity
/// without inventing its own side channel.
// TODO: wire a real progress source once a phase implementation needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub current_activity: Option<String>,
    pub progress: Option<String>,
}

/// `(metadata, run, task)` — the serialisable instance snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRun {
    pub metadata: JobInstanceMetadata,
    pub run: RunSnapshot,
    pub task: Option<TrackingInfo>,
}

impl JobRun {
    pub fn new(metadata: JobInstanceMetadata, run: RunSnapshot) -> Self {
        Self { metadata, run, task: None }
    }
}

#[cfg(test)]
#[path = "job_run_tests.rs"]
mod tests;
