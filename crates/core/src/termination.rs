// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Termination status, its flag classification, and the fault types carried
//! alongside a failed or errored run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::ops::{BitOr, BitOrAssign};

/// A single bit in the [`TerminationStatus`] flag classification.
///
/// Kept as a hand-rolled bitset rather than pulling in a flags crate: the
/// flag count is small and fixed, and the set only needs `contains`/union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TerminationStatusFlag(u16);

impl TerminationStatusFlag {
    pub const NONE: Self = Self(0);
    pub const BEFORE_EXECUTION: Self = Self(1 << 0);
    pub const UNEXECUTED: Self = Self(1 << 1);
    pub const WAITING: Self = Self(1 << 2);
    pub const DISCARDED: Self = Self(1 << 3);
    pub const REJECTED: Self = Self(1 << 4);
    pub const EXECUTED: Self = Self(1 << 5);
    pub const SUCCESS: Self = Self(1 << 6);
    pub const NONSUCCESS: Self = Self(1 << 7);
    pub const INCOMPLETE: Self = Self(1 << 8);
    pub const FAILURE: Self = Self(1 << 9);
    pub const ABORTED: Self = Self(1 << 10);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for TerminationStatusFlag {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TerminationStatusFlag {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The final reason an instance's lifecycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationStatus {
    None,
    Unknown,
    Created,
    Pending,
    Queued,
    Cancelled,
    Timeout,
    InvalidOverlap,
    Unsatisfied,
    Running,
    Completed,
    Stopped,
    Interrupted,
    Failed,
    Error,
}

crate::simple_display! {
    TerminationStatus {
        None => "NONE",
        Unknown => "UNKNOWN",
        Created => "CREATED",
        Pending => "PENDING",
        Queued => "QUEUED",
        Cancelled => "CANCELLED",
        Timeout => "TIMEOUT",
        InvalidOverlap => "INVALID_OVERLAP",
        Unsatisfied => "UNSATISFIED",
        Running => "RUNNING",
        Completed => "COMPLETED",
        Stopped => "STOPPED",
        Interrupted => "INTERRUPTED",
        Failed => "FAILED",
        Error => "ERROR",
    }
}

impl TerminationStatus {
    /// The flag set that classifies this status, per the public contract
    /// clients filter on (e.g. "all failures", "all non-success outcomes").
    pub fn flags(self) -> TerminationStatusFlag {
        use TerminationStatusFlag as F;
        match self {
            Self::None => F::NONE,
            Self::Unknown => F::NONE,
            Self::Created => F::BEFORE_EXECUTION | F::UNEXECUTED,
            Self::Pending => F::BEFORE_EXECUTION | F::UNEXECUTED | F::WAITING,
            Self::Queued => F::BEFORE_EXECUTION | F::UNEXECUTED | F::WAITING,
            Self::Cancelled => F::UNEXECUTED | F::NONSUCCESS | F::DISCARDED | F::ABORTED,
            Self::Timeout => F::UNEXECUTED | F::NONSUCCESS | F::DISCARDED | F::REJECTED,
            Self::InvalidOverlap => F::UNEXECUTED | F::NONSUCCESS | F::DISCARDED | F::REJECTED,
            Self::Unsatisfied => F::UNEXECUTED | F::NONSUCCESS | F::DISCARDED | F::REJECTED,
            Self::Running => F::EXECUTED,
            Self::Completed => F::EXECUTED | F::SUCCESS,
            Self::Stopped => F::EXECUTED | F::NONSUCCESS | F::INCOMPLETE | F::ABORTED,
            Self::Interrupted => F::EXECUTED | F::NONSUCCESS | F::INCOMPLETE | F::ABORTED,
            Self::Failed => F::EXECUTED | F::NONSUCCESS | F::INCOMPLETE | F::FAILURE,
            Self::Error => F::EXECUTED | F::NONSUCCESS | F::INCOMPLETE | F::FAILURE,
        }
    }

    pub fn has_flag(self, flag: TerminationStatusFlag) -> bool {
        self.flags().contains(flag)
    }
}

/// Structured failure information: a type tag plus a human reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub fault_type: SmolStr,
    pub reason: String,
}

impl Fault {
    pub fn new(fault_type: impl Into<SmolStr>, reason: impl Into<String>) -> Self {
        Self { fault_type: fault_type.into(), reason: reason.into() }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.fault_type, self.reason)
    }
}

/// A domain failure signalled deliberately by a phase body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("run failed: {0}")]
pub struct RunFailure(pub Fault);

/// An unexpected error captured from a phase body that did not signal a
/// structured failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("run error: {0}")]
pub struct RunError(pub Fault);

impl RunError {
    pub fn captured(class_name: impl Into<SmolStr>, message: impl Into<String>) -> Self {
        Self(Fault::new(class_name, message))
    }
}

/// `(termination_status, terminated_at, failure?, error?)`.
///
/// Exactly one of `failure`/`error` may be set; both may be absent on a
/// clean exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationInfo {
    pub status: TerminationStatus,
    pub terminated_at: DateTime<Utc>,
    pub failure: Option<Fault>,
    pub error: Option<Fault>,
}

impl TerminationInfo {
    pub fn new(status: TerminationStatus, terminated_at: DateTime<Utc>) -> Self {
        Self { status, terminated_at, failure: None, error: None }
    }

    pub fn with_failure(status: TerminationStatus, terminated_at: DateTime<Utc>, failure: Fault) -> Self {
        Self { status, terminated_at, failure: Some(failure), error: None }
    }

    pub fn with_error(status: TerminationStatus, terminated_at: DateTime<Utc>, error: Fault) -> Self {
        Self { status, terminated_at, failure: None, error: Some(error) }
    }
}

#[cfg(test)]
#[path = "termination_tests.rs"]
mod tests;
