// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn completed_is_executed_and_success() {
    let flags = TerminationStatus::Completed.flags();
    assert!(flags.contains(TerminationStatusFlag::EXECUTED));
    assert!(flags.contains(TerminationStatusFlag::SUCCESS));
    assert!(!flags.contains(TerminationStatusFlag::FAILURE));
}

#[test]
fn failed_and_error_are_both_failures() {
    assert!(TerminationStatus::Failed.has_flag(TerminationStatusFlag::FAILURE));
    assert!(TerminationStatus::Error.has_flag(TerminationStatusFlag::FAILURE));
    assert!(!TerminationStatus::Completed.has_flag(TerminationStatusFlag::FAILURE));
}

#[test]
fn cancelled_and_timeout_never_executed() {
    for status in [TerminationStatus::Cancelled, TerminationStatus::Timeout] {
        let flags = status.flags();
        assert!(flags.contains(TerminationStatusFlag::UNEXECUTED));
        assert!(!flags.contains(TerminationStatusFlag::EXECUTED));
    }
}

#[test]
fn pre_execution_rejections_carry_nonsuccess_but_not_before_execution() {
    for status in [
        TerminationStatus::Cancelled,
        TerminationStatus::Timeout,
        TerminationStatus::InvalidOverlap,
        TerminationStatus::Unsatisfied,
    ] {
        let flags = status.flags();
        assert!(flags.contains(TerminationStatusFlag::NONSUCCESS));
        assert!(!flags.contains(TerminationStatusFlag::BEFORE_EXECUTION));
    }
}

#[test]
fn failed_and_error_are_incomplete() {
    for status in [TerminationStatus::Failed, TerminationStatus::Error] {
        assert!(status.has_flag(TerminationStatusFlag::INCOMPLETE));
    }
}

#[test]
fn termination_info_carries_exactly_one_of_failure_or_error() {
    let ts = Utc::now();
    let with_failure = TerminationInfo::with_failure(
        TerminationStatus::Failed,
        ts,
        Fault::new("DownloadError", "404"),
    );
    assert!(with_failure.failure.is_some());
    assert!(with_failure.error.is_none());

    let with_error = TerminationInfo::with_error(
        TerminationStatus::Error,
        ts,
        Fault::new("InvalidStateError", "reason"),
    );
    assert!(with_error.error.is_some());
    assert!(with_error.failure.is_none());
}

#[test]
fn serde_round_trip_for_termination_info() {
    let info = TerminationInfo::new(TerminationStatus::Completed, Utc::now());
    let json = serde_json::to_string(&info).unwrap();
    let parsed: TerminationInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(info, parsed);
}
