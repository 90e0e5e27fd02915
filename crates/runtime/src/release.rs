// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ReleaseHandle` implementations binding the API server's release/dispatch
//! endpoints to the coordination phases that actually block a run.

use crate::instance::{DispatchOutcome, ReleaseHandle};
use oj_phaser::{ApprovalPhase, ExecutionQueue, WaiterState};
use oj_core::RunState;
use std::iter::once;
use std::sync::Arc;
use tokio::sync::Notify;

/// Binds `/jobs/release/waiting` and `/jobs/release/pending` to an
/// [`ApprovalPhase`] blocking in `RunState::Pending`. `pending_group` is the
/// value the instance was tagged with when the phase was constructed (see
/// spec's `("coord", "approval")`/`("pending_group", G)` system parameters);
/// a request naming a different group is a no-op.
pub struct ApprovalReleaseHandle {
    phase: Arc<ApprovalPhase>,
    pending_group: Option<String>,
}

impl ApprovalReleaseHandle {
    pub fn new(phase: Arc<ApprovalPhase>, pending_group: Option<String>) -> Self {
        Self { phase, pending_group }
    }
}

impl ReleaseHandle for ApprovalReleaseHandle {
    fn release_waiting(&self, waiting_state: RunState) -> bool {
        if waiting_state != RunState::Pending {
            return false;
        }
        self.phase.approve();
        true
    }

    fn release_pending(&self, pending_group: &str) -> bool {
        if self.pending_group.as_deref() != Some(pending_group) {
            return false;
        }
        self.phase.approve();
        true
    }

    fn signal_dispatch(&self) -> DispatchOutcome {
        DispatchOutcome::default()
    }
}

/// Binds `/jobs/_signal/dispatch` to an [`ExecutionQueue`] waiter. Unlike a
/// plain wakeup nudge, this commits the dispatch decision synchronously:
/// a waiter still `InQueue` is marked dispatched on its own `DispatchBoard`
/// right here, so the caller's `executed` reflects a decision that has
/// actually been made, not one that might still be pending on the waiter's
/// own task.
pub struct QueueReleaseHandle {
    queue: Arc<ExecutionQueue>,
    dispatch_signal: Arc<Notify>,
}

impl QueueReleaseHandle {
    pub fn new(queue: Arc<ExecutionQueue>, dispatch_signal: Arc<Notify>) -> Self {
        Self { queue, dispatch_signal }
    }
}

impl ReleaseHandle for QueueReleaseHandle {
    fn release_waiting(&self, _waiting_state: RunState) -> bool {
        false
    }

    fn release_pending(&self, _pending_group: &str) -> bool {
        false
    }

    fn signal_dispatch(&self) -> DispatchOutcome {
        if self.queue.state() != WaiterState::InQueue {
            return DispatchOutcome { waiter_found: false, executed: false };
        }
        self.queue.board().mark_dispatched(once(self.queue.instance_id()));
        self.dispatch_signal.notify_waiters();
        DispatchOutcome { waiter_found: true, executed: true }
    }
}

#[cfg(test)]
#[path = "release_tests.rs"]
mod tests;
