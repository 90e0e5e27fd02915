// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    init = { init_phase(), standard_phase_names::INIT, RunState::Created },
    terminal = { terminal_phase(), standard_phase_names::TERMINAL, RunState::Ended },
)]
fn bookend_phase_metadata(phase: NoOpsPhase, name: &str, run_state: RunState) {
    assert_eq!(phase.metadata().name, name);
    assert_eq!(phase.metadata().run_state, run_state);
}

#[test]
fn init_phase_stops_with_stopped_not_cancelled() {
    assert_eq!(init_phase().stop_status(), TerminationStatus::Stopped);
}

#[test]
fn terminal_phase_has_no_stop_status() {
    assert_eq!(terminal_phase().stop_status(), TerminationStatus::None);
}
