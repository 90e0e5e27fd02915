// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn display_and_parse_round_trip() {
    for state in [
        RunState::None,
        RunState::Unknown,
        RunState::Created,
        RunState::Pending,
        RunState::Waiting,
        RunState::Evaluating,
        RunState::InQueue,
        RunState::Executing,
        RunState::Ended,
    ] {
        let rendered = state.to_string();
        assert_eq!(RunState::from_str_loose(&rendered), Some(state));
    }
}

#[test]
fn parse_is_case_insensitive() {
    assert_eq!(RunState::from_str_loose("executing"), Some(RunState::Executing));
    assert_eq!(RunState::from_str_loose("in_queue"), Some(RunState::InQueue));
}

#[test]
fn unknown_token_parses_to_none() {
    assert_eq!(RunState::from_str_loose("not-a-state"), None);
}

#[yare::parameterized(
    ended = { RunState::Ended },
)]
fn outcome_states(state: RunState) {
    assert!(state.is_outcome());
}

#[yare::parameterized(
    none = { RunState::None },
    unknown = { RunState::Unknown },
    created = { RunState::Created },
    pending = { RunState::Pending },
    waiting = { RunState::Waiting },
    evaluating = { RunState::Evaluating },
    in_queue = { RunState::InQueue },
    executing = { RunState::Executing },
)]
fn non_outcome_states(state: RunState) {
    assert!(!state.is_outcome());
}
