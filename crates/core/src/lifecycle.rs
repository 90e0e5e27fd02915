// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The append-only log of phase runs that make up an instance's lifecycle.

use crate::run_state::RunState;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Static description of a phase, copied into its metadata at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMetadata {
    pub name: SmolStr,
    pub run_state: RunState,
    pub parameters: IndexMap<String, String>,
}

impl PhaseMetadata {
    pub fn new(name: impl Into<SmolStr>, run_state: RunState) -> Self {
        Self { name: name.into(), run_state, parameters: IndexMap::new() }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Standard phase names present in every Phaser-driven lifecycle.
pub mod standard_phase_names {
    pub const INIT: &str = "INIT";
    pub const TERMINAL: &str = "TERMINAL";
}

/// A single entry in the lifecycle log.
///
/// `ended_at` is set when the next phase begins, or — for the terminal phase
/// — remains unset until the process exits; per-phase duration is therefore
/// derived, never stored directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRun {
    pub phase_name: SmolStr,
    pub run_state: RunState,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl PhaseRun {
    pub fn new(phase_name: impl Into<SmolStr>, run_state: RunState, started_at: DateTime<Utc>) -> Self {
        Self { phase_name: phase_name.into(), run_state, started_at, ended_at: None }
    }

    /// Wall-clock duration spent in this phase, if it has ended.
    pub fn run_time(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }
}

/// Ordered, append-only collection of [`PhaseRun`]s keyed by phase name.
///
/// Invariant: no phase name may appear twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    runs: Vec<PhaseRun>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// Append a new run, closing out the previous one's `ended_at`.
    ///
    /// Panics if `started_at` predates the previous run's start — callers
    /// are expected to drive this exclusively from the Phaser's transition
    /// lock, which enforces monotonic timestamps via its clock.
    pub fn add_phase_run(&mut self, run: PhaseRun) {
        if let Some(previous) = self.runs.last_mut() {
            previous.ended_at = Some(run.started_at);
        }
        self.runs.push(run);
    }

    pub fn runs(&self) -> &[PhaseRun] {
        &self.runs
    }

    pub fn current(&self) -> Option<&PhaseRun> {
        self.runs.last()
    }

    pub fn previous(&self) -> Option<&PhaseRun> {
        self.runs.len().checked_sub(2).map(|i| &self.runs[i])
    }

    pub fn phase_ordinal(&self, phase_name: &str) -> Option<usize> {
        self.runs.iter().position(|r| r.phase_name == phase_name)
    }

    /// Runs between the first occurrence of `from` and the first subsequent
    /// occurrence of `to`, inclusive. Returns the single matching run if
    /// `from == to`. Returns an empty slice if `to` is never reached.
    pub fn runs_between(&self, from: &str, to: &str) -> Vec<&PhaseRun> {
        let Some(start) = self.phase_ordinal(from) else { return Vec::new() };
        if from == to {
            return vec![&self.runs[start]];
        }
        match self.runs[start..].iter().position(|r| r.phase_name == to) {
            Some(offset) => self.runs[start..=start + offset].iter().collect(),
            None => Vec::new(),
        }
    }

    /// Phase names between `from` and `to`, inclusive. See [`Self::runs_between`].
    pub fn phases_between(&self, from: &str, to: &str) -> Vec<SmolStr> {
        self.runs_between(from, to).into_iter().map(|r| r.phase_name.clone()).collect()
    }

    /// The first timestamp at which `state` was entered.
    pub fn state_first_at(&self, state: RunState) -> Option<DateTime<Utc>> {
        self.runs.iter().find(|r| r.run_state == state).map(|r| r.started_at)
    }

    /// The last timestamp at which `state` was entered.
    pub fn state_last_at(&self, state: RunState) -> Option<DateTime<Utc>> {
        self.runs.iter().rev().find(|r| r.run_state == state).map(|r| r.started_at)
    }

    /// Total wall-clock time spent in runs matching `state`, counting open
    /// runs (no `ended_at`) up to `now`.
    pub fn run_time_in_state(&self, state: RunState, now: DateTime<Utc>) -> chrono::Duration {
        self.runs
            .iter()
            .filter(|r| r.run_state == state)
            .map(|r| r.ended_at.unwrap_or(now) - r.started_at)
            .fold(chrono::Duration::zero(), |acc, d| acc + d)
    }

    pub fn total_executing_time(&self, now: DateTime<Utc>) -> chrono::Duration {
        self.run_time_in_state(RunState::Executing, now)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.state_first_at(RunState::Created)
    }

    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.state_first_at(RunState::Executing)
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.state_last_at(RunState::Ended)
    }

    pub fn is_ended(&self) -> bool {
        self.runs.iter().any(|r| r.run_state == RunState::Ended)
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
