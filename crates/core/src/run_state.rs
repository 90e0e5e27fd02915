// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coarse classification of what a phase is doing at a given moment.

use serde::{Deserialize, Serialize};

/// Coarse run-state classification recorded on every [`crate::lifecycle::PhaseRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// No state has been recorded yet.
    None,
    /// The run state could not be classified.
    Unknown,
    /// The instance has been created but no phase has started.
    Created,
    /// Waiting on an external decision (e.g. manual approval).
    Pending,
    /// Waiting on an observable condition.
    Waiting,
    /// Evaluating a coordination predicate (no-overlap, dependency).
    Evaluating,
    /// Admitted to an execution queue, waiting for a free slot.
    InQueue,
    /// The job's program body is running.
    Executing,
    /// The instance has reached a terminal phase.
    Ended,
}

impl RunState {
    /// Parse a run state from its wire/display name, case-insensitively.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "NONE" => Self::None,
            "UNKNOWN" => Self::Unknown,
            "CREATED" => Self::Created,
            "PENDING" => Self::Pending,
            "WAITING" => Self::Waiting,
            "EVALUATING" => Self::Evaluating,
            "IN_QUEUE" => Self::InQueue,
            "EXECUTING" => Self::Executing,
            "ENDED" => Self::Ended,
            _ => return None,
        })
    }

    /// True for states in which the instance is still alive and may progress.
    pub fn is_outcome(self) -> bool {
        matches!(self, Self::Ended)
    }
}

crate::simple_display! {
    RunState {
        None => "NONE",
        Unknown => "UNKNOWN",
        Created => "CREATED",
        Pending => "PENDING",
        Waiting => "WAITING",
        Evaluating => "EVALUATING",
        InQueue => "IN_QUEUE",
        Executing => "EXECUTING",
        Ended => "ENDED",
    }
}

#[cfg(test)]
#[path = "run_state_tests.rs"]
mod tests;
