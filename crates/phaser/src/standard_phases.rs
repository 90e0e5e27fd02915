// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `INIT` and `TERMINAL`: the synthetic phases every Phaser enters first
//! and last.

use crate::phase::{Phase, PhaseSignal};
use async_trait::async_trait;
use oj_core::lifecycle::standard_phase_names;
use oj_core::{PhaseMetadata, RunState, TerminationStatus};

/// A phase whose body does nothing; used as the base for `InitPhase` and
/// `TerminalPhase`, and available directly for user phases that exist only
/// to mark a run-state transition.
pub struct NoOpsPhase {
    name: smol_str::SmolStr,
    run_state: RunState,
    stop_status: TerminationStatus,
}

impl NoOpsPhase {
    pub fn new(name: impl Into<smol_str::SmolStr>, run_state: RunState, stop_status: TerminationStatus) -> Self {
        Self { name: name.into(), run_state, stop_status }
    }
}

#[async_trait]
impl Phase for NoOpsPhase {
    fn metadata(&self) -> PhaseMetadata {
        PhaseMetadata::new(self.name.clone(), self.run_state)
    }

    fn stop_status(&self) -> TerminationStatus {
        self.stop_status
    }

    async fn run(&self) -> Result<(), PhaseSignal> {
        Ok(())
    }

    fn stop(&self) {}
}

pub fn init_phase() -> NoOpsPhase {
    NoOpsPhase::new(standard_phase_names::INIT, RunState::Created, TerminationStatus::Stopped)
}

pub fn terminal_phase() -> NoOpsPhase {
    NoOpsPhase::new(standard_phase_names::TERMINAL, RunState::Ended, TerminationStatus::None)
}

#[cfg(test)]
#[path = "standard_phases_tests.rs"]
mod tests;
