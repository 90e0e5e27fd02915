// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::job_run::{JobRun, RunSnapshot};
use crate::lifecycle::{Lifecycle, PhaseRun};
use crate::metadata::JobInstanceMetadata;
use crate::run_state::RunState;
use crate::termination::{TerminationInfo, TerminationStatus};
use chrono::{DateTime, Utc};

/// Proptest strategies for core state machine types.
#[cfg(feature = "proptest")]
pub mod strategies {
    use crate::run_state::RunState;
    use crate::termination::TerminationStatus;
    use proptest::prelude::*;

    pub fn arb_run_state() -> impl Strategy<Value = RunState> {
        prop_oneof![
            Just(RunState::None),
            Just(RunState::Unknown),
            Just(RunState::Created),
            Just(RunState::Pending),
            Just(RunState::Waiting),
            Just(RunState::Evaluating),
            Just(RunState::InQueue),
            Just(RunState::Executing),
            Just(RunState::Ended),
        ]
    }

    pub fn arb_termination_status() -> impl Strategy<Value = TerminationStatus> {
        prop_oneof![
            Just(TerminationStatus::Completed),
            Just(TerminationStatus::Stopped),
            Just(TerminationStatus::Interrupted),
            Just(TerminationStatus::Failed),
            Just(TerminationStatus::Error),
            Just(TerminationStatus::Cancelled),
            Just(TerminationStatus::Timeout),
            Just(TerminationStatus::InvalidOverlap),
            Just(TerminationStatus::Unsatisfied),
        ]
    }
}

/// Build a minimal completed `JobRun` for tests that only need a plausible
/// instance snapshot, not a real Phaser run.
pub fn completed_job_run(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> JobRun {
    let metadata = JobInstanceMetadata::builder().build();
    let mut lifecycle = Lifecycle::new();
    lifecycle.add_phase_run(PhaseRun::new("INIT", RunState::Created, started_at));
    lifecycle.add_phase_run(PhaseRun::new("TERMINAL", RunState::Ended, ended_at));
    let snapshot = RunSnapshot::new(Vec::new(), lifecycle, Some(TerminationInfo::new(TerminationStatus::Completed, ended_at)));
    JobRun::new(metadata, snapshot)
}
