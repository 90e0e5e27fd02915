// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Phase` trait: one named stage in an instance's lifecycle.

use async_trait::async_trait;
use oj_core::{Fault, PhaseMetadata, TerminationStatus};
use std::sync::Arc;

/// What a phase body returns when it wants to end the run early, rather
/// than simply falling through to the next phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseSignal {
    /// End the run now with the given status (e.g. `TIMEOUT`, `UNSATISFIED`).
    Terminate(TerminationStatus),
    /// End the run with a domain failure signalled deliberately by the phase.
    Failed(Fault),
    /// End the run with an unexpected error propagated from the phase body.
    Error(Fault),
}

/// A named stage in a Phaser's lifecycle.
///
/// `run()` is invoked by the Phaser outside its transition lock, so it may
/// block arbitrarily (I/O, events, timeouts). `stop()` must be safe to call
/// from any thread at any time and must not block.
#[async_trait]
pub trait Phase: Send + Sync {
    /// Static description of this phase, copied into the lifecycle's
    /// `PhaseMetadata` when the phase is entered.
    fn metadata(&self) -> PhaseMetadata;

    /// The termination status to record if `stop()` interrupts this phase.
    fn stop_status(&self) -> TerminationStatus {
        TerminationStatus::Cancelled
    }

    /// Run the phase body. `Ok(())` means normal completion (continue to
    /// the next phase); `Err(signal)` ends the run.
    async fn run(&self) -> Result<(), PhaseSignal>;

    /// Request early termination. Must be idempotent and non-blocking.
    fn stop(&self);
}

pub type PhaseRef = Arc<dyn Phase>;

/// Wraps a phase to expose [`RunStartedPhase::wait`], which blocks until the
/// wrapped phase's `run()` has actually begun executing rather than merely
/// been scheduled. Used by test harnesses that need to synchronize on a
/// phase body being underway before asserting or signalling it.
pub struct RunStartedPhase {
    inner: PhaseRef,
    notify: Arc<tokio::sync::Notify>,
    started: std::sync::atomic::AtomicBool,
}

impl RunStartedPhase {
    pub fn new(inner: PhaseRef) -> Self {
        Self { inner, notify: Arc::new(tokio::sync::Notify::new()), started: std::sync::atomic::AtomicBool::new(false) }
    }

    /// Block until `run()` has started, or `timeout` elapses. Returns
    /// whether it was observed to have started.
    pub async fn wait(&self, timeout: std::time::Duration) -> bool {
        if self.started.load(std::sync::atomic::Ordering::SeqCst) {
            return true;
        }
        let notified = self.notify.notified();
        tokio::time::timeout(timeout, notified).await.is_ok() || self.started.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl Phase for RunStartedPhase {
    fn metadata(&self) -> PhaseMetadata {
        self.inner.metadata()
    }

    fn stop_status(&self) -> TerminationStatus {
        self.inner.stop_status()
    }

    async fn run(&self) -> Result<(), PhaseSignal> {
        self.started.store(true, std::sync::atomic::Ordering::SeqCst);
        self.notify.notify_waiters();
        self.inner.run().await
    }

    fn stop(&self) {
        self.inner.stop();
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
