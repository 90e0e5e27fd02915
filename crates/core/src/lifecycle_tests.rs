// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;

fn at(offset_secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000 + offset_secs, 0).unwrap()
}

fn sample_lifecycle() -> Lifecycle {
    let mut lc = Lifecycle::new();
    lc.add_phase_run(PhaseRun::new("INIT", RunState::Created, at(0)));
    lc.add_phase_run(PhaseRun::new("APPROVAL", RunState::Pending, at(1)));
    lc.add_phase_run(PhaseRun::new("EXEC", RunState::Executing, at(2)));
    lc.add_phase_run(PhaseRun::new("TERMINAL", RunState::Ended, at(5)));
    lc
}

#[test]
fn add_phase_run_closes_out_the_previous_run() {
    let lc = sample_lifecycle();
    assert_eq!(lc.runs()[0].ended_at, Some(at(1)));
    assert_eq!(lc.runs()[2].ended_at, Some(at(5)));
    assert_eq!(lc.current().unwrap().phase_name, "TERMINAL");
}

#[test]
fn runs_between_is_inclusive_and_ordered() {
    let lc = sample_lifecycle();
    let names: Vec<_> = lc.runs_between("APPROVAL", "TERMINAL").into_iter().map(|r| r.phase_name.clone()).collect();
    assert_eq!(names, vec!["APPROVAL", "EXEC", "TERMINAL"]);
}

#[test]
fn runs_between_same_phase_returns_single_run() {
    let lc = sample_lifecycle();
    let runs = lc.runs_between("EXEC", "EXEC");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].phase_name, "EXEC");
}

#[test]
fn runs_between_returns_empty_when_target_not_reached() {
    let mut lc = Lifecycle::new();
    lc.add_phase_run(PhaseRun::new("INIT", RunState::Created, at(0)));
    lc.add_phase_run(PhaseRun::new("APPROVAL", RunState::Pending, at(1)));
    assert!(lc.runs_between("APPROVAL", "TERMINAL").is_empty());
}

#[test]
fn phases_between_maps_to_names() {
    let lc = sample_lifecycle();
    assert_eq!(lc.phases_between("INIT", "EXEC"), vec!["INIT", "APPROVAL", "EXEC"]);
}

#[test]
fn total_executing_time_sums_closed_runs() {
    let lc = sample_lifecycle();
    let total = lc.total_executing_time(at(10));
    assert_eq!(total, Duration::seconds(3));
}

#[test]
fn run_time_in_state_counts_open_run_up_to_now() {
    let mut lc = Lifecycle::new();
    lc.add_phase_run(PhaseRun::new("EXEC", RunState::Executing, at(0)));
    let total = lc.run_time_in_state(RunState::Executing, at(4));
    assert_eq!(total, Duration::seconds(4));
}

#[test]
fn is_ended_requires_an_ended_run() {
    let mut lc = Lifecycle::new();
    lc.add_phase_run(PhaseRun::new("INIT", RunState::Created, at(0)));
    assert!(!lc.is_ended());
    lc.add_phase_run(PhaseRun::new("TERMINAL", RunState::Ended, at(1)));
    assert!(lc.is_ended());
}

#[test]
fn ended_at_is_the_last_ended_run_not_the_first() {
    let mut lc = Lifecycle::new();
    lc.add_phase_run(PhaseRun::new("INIT", RunState::Created, at(0)));
    lc.add_phase_run(PhaseRun::new("TERMINAL", RunState::Ended, at(1)));
    lc.add_phase_run(PhaseRun::new("APPROVAL", RunState::Pending, at(2)));
    lc.add_phase_run(PhaseRun::new("TERMINAL", RunState::Ended, at(3)));
    assert_eq!(lc.ended_at(), Some(at(3)));
}

#[test]
fn serde_round_trip() {
    let lc = sample_lifecycle();
    let json = serde_json::to_string(&lc).unwrap();
    let parsed: Lifecycle = serde_json::from_str(&json).unwrap();
    assert_eq!(lc, parsed);
}
