// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polls a set of observable conditions until all report satisfied, one
//! reports unsatisfied, or `timeout` elapses.

use crate::phase::{Phase, PhaseSignal};
use async_trait::async_trait;
use oj_core::{PhaseMetadata, RunState, TerminationStatus};
use smol_str::SmolStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// The outcome of evaluating one [`ObservableCondition`] at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionResult {
    /// Not evaluated yet; keep polling.
    None,
    Satisfied,
    Unsatisfied,
    /// The evaluation logic itself failed; treated the same as `Unsatisfied`.
    EvaluationError,
}

#[async_trait]
pub trait ObservableCondition: Send + Sync {
    async fn evaluate(&self) -> ConditionResult;
}

pub struct WaitingPhase {
    name: SmolStr,
    conditions: Vec<Arc<dyn ObservableCondition>>,
    poll_interval: Duration,
    timeout: Option<Duration>,
    stopped: Arc<AtomicBool>,
}

impl WaitingPhase {
    pub fn new(name: impl Into<SmolStr>, conditions: Vec<Arc<dyn ObservableCondition>>, poll_interval: Duration, timeout: Option<Duration>) -> Self {
        Self { name: name.into(), conditions, poll_interval, timeout, stopped: Arc::new(AtomicBool::new(false)) }
    }
}

#[async_trait]
impl Phase for WaitingPhase {
    fn metadata(&self) -> PhaseMetadata {
        PhaseMetadata::new(self.name.clone(), RunState::Waiting)
    }

    fn stop_status(&self) -> TerminationStatus {
        TerminationStatus::Cancelled
    }

    async fn run(&self) -> Result<(), PhaseSignal> {
        let deadline = self.timeout.map(|t| tokio::time::Instant::now() + t);
        loop {
            if self.stopped.load(Ordering::SeqCst) {
                return Err(PhaseSignal::Terminate(TerminationStatus::Cancelled));
            }

            let mut all_satisfied = true;
            for condition in &self.conditions {
                match condition.evaluate().await {
                    ConditionResult::Satisfied => {}
                    ConditionResult::None => all_satisfied = false,
                    ConditionResult::Unsatisfied | ConditionResult::EvaluationError => {
                        return Err(PhaseSignal::Terminate(TerminationStatus::Unsatisfied));
                    }
                }
            }
            if all_satisfied {
                return Ok(());
            }

            match deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.poll_interval) => {}
                        _ = tokio::time::sleep_until(deadline) => {
                            return Err(PhaseSignal::Terminate(TerminationStatus::Timeout));
                        }
                    }
                }
                None => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "waiting_tests.rs"]
mod tests;
