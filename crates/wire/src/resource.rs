// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource path constants for the per-instance API server.

/// List the matching job runs.
pub const JOBS: &str = "/jobs";
/// Release an instance waiting in a given waiting-phase run state.
pub const JOBS_RELEASE_WAITING: &str = "/jobs/release/waiting";
/// Release an instance pending on a given group.
pub const JOBS_RELEASE_PENDING: &str = "/jobs/release/pending";
/// Stop matching instances.
pub const JOBS_STOP: &str = "/jobs/stop";
/// Read the last N lines of captured output.
pub const JOBS_TAIL: &str = "/jobs/tail";
/// Signal an execution-queue waiter to become dispatched.
pub const JOBS_SIGNAL_DISPATCH: &str = "/jobs/_signal/dispatch";

/// All built-in resource paths, for validating an unknown-path 404.
pub const ALL: &[&str] = &[
    JOBS,
    JOBS_RELEASE_WAITING,
    JOBS_RELEASE_PENDING,
    JOBS_STOP,
    JOBS_TAIL,
    JOBS_SIGNAL_DISPATCH,
];
