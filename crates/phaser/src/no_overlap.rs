// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admits at most one instance of a job into a protected phase window at a
//! time.

use crate::phase::{Phase, PhaseSignal};
use async_trait::async_trait;
use oj_core::{InstanceId, JobId, PhaseMetadata, RunState, TerminationStatus};
use smol_str::SmolStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Atomically checks whether another instance of `job_id` currently holds
/// the protected window and, if not, claims it on this instance's behalf.
/// The runtime's implementation guards this check with the process-wide
/// host lock so the inspect-then-claim sequence is atomic across processes.
#[async_trait]
pub trait OverlapGuard: Send + Sync {
    async fn try_enter(&self, job_id: &JobId, instance_id: &InstanceId) -> bool;
    async fn exit(&self, job_id: &JobId, instance_id: &InstanceId);
}

/// What to do when another instance already holds the protected window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Fail immediately with `INVALID_OVERLAP`.
    Reject,
    /// Poll until the window is free.
    WaitForTurn,
}

pub struct NoOverlapPhase {
    name: SmolStr,
    job_id: JobId,
    instance_id: InstanceId,
    guard: Arc<dyn OverlapGuard>,
    policy: OverlapPolicy,
    poll_interval: Duration,
    stopped: Arc<AtomicBool>,
}

impl NoOverlapPhase {
    pub fn new(
        name: impl Into<SmolStr>,
        job_id: JobId,
        instance_id: InstanceId,
        guard: Arc<dyn OverlapGuard>,
        policy: OverlapPolicy,
        poll_interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            job_id,
            instance_id,
            guard,
            policy,
            poll_interval,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl Phase for NoOverlapPhase {
    fn metadata(&self) -> PhaseMetadata {
        PhaseMetadata::new(self.name.clone(), RunState::Evaluating)
    }

    fn stop_status(&self) -> TerminationStatus {
        TerminationStatus::Cancelled
    }

    async fn run(&self) -> Result<(), PhaseSignal> {
        loop {
            if self.stopped.load(Ordering::SeqCst) {
                return Err(PhaseSignal::Terminate(TerminationStatus::Cancelled));
            }
            if self.guard.try_enter(&self.job_id, &self.instance_id).await {
                return Ok(());
            }
            if self.policy == OverlapPolicy::Reject {
                return Err(PhaseSignal::Terminate(TerminationStatus::InvalidOverlap));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "no_overlap_tests.rs"]
mod tests;
