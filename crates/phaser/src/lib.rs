// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase-state-machine execution engine: drives a job instance through its
//! ordered coordination and execution phases, recording the lifecycle.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod approval;
pub mod dependency;
pub mod no_overlap;
pub mod phase;
pub mod phaser;
pub mod queue;
pub mod standard_phases;
pub mod waiting;

pub use approval::ApprovalPhase;
pub use dependency::DependencyPhase;
pub use no_overlap::NoOverlapPhase;
pub use phase::{Phase, PhaseRef, PhaseSignal, RunStartedPhase};
pub use phaser::{Phaser, PhaserError};
pub use queue::{ExecutionQueue, WaiterState};
pub use standard_phases::{init_phase, terminal_phase, NoOpsPhase};
pub use waiting::{ConditionResult, ObservableCondition, WaitingPhase};
