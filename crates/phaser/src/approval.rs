// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waits for an external approval signal, or times out.

use crate::phase::{Phase, PhaseSignal};
use async_trait::async_trait;
use oj_core::{PhaseMetadata, RunState, TerminationStatus};
use smol_str::SmolStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// A phase that blocks until [`ApprovalPhase::approve`] is called from
/// outside (e.g. by the API server handling a release request) or `timeout`
/// elapses, whichever comes first.
pub struct ApprovalPhase {
    name: SmolStr,
    timeout: Duration,
    approved: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ApprovalPhase {
    pub fn new(name: impl Into<SmolStr>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            timeout,
            approved: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Release this phase, letting the run proceed to the next phase.
    pub fn approve(&self) {
        self.approved.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }
}

#[async_trait]
impl Phase for ApprovalPhase {
    fn metadata(&self) -> PhaseMetadata {
        PhaseMetadata::new(self.name.clone(), RunState::Pending)
    }

    fn stop_status(&self) -> TerminationStatus {
        TerminationStatus::Cancelled
    }

    async fn run(&self) -> Result<(), PhaseSignal> {
        if self.approved.load(Ordering::SeqCst) {
            return Ok(());
        }
        let deadline = tokio::time::Instant::now() + self.timeout;
        loop {
            if self.stopped.load(Ordering::SeqCst) {
                return Err(PhaseSignal::Terminate(TerminationStatus::Cancelled));
            }
            tokio::select! {
                _ = self.notify.notified() => {
                    if self.approved.load(Ordering::SeqCst) {
                        return Ok(());
                    }
                    // woken by stop(); loop around to observe it
                }
                _ = tokio::time::sleep_until(deadline) => {
                    return Err(PhaseSignal::Terminate(TerminationStatus::Timeout));
                }
            }
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }
}

#[cfg(test)]
#[path = "approval_tests.rs"]
mod tests;
