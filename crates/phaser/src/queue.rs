// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The execution queue: a waiter parks here until the scheduler admits it
//! to run, or it is cancelled.

use crate::phase::{Phase, PhaseSignal};
use async_trait::async_trait;
use oj_core::{InstanceId, PhaseMetadata, RunState, TerminationStatus};
use parking_lot::Mutex;
use smol_str::SmolStr;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaiterState {
    None,
    InQueue,
    Dispatched,
    Cancelled,
}

/// Decides, given the current set of waiters, which ones to admit. The
/// runtime's implementation wraps this in the process-wide host lock so
/// admission decisions are atomic across every process sharing the queue.
#[async_trait]
pub trait QueueAdmission: Send + Sync {
    async fn try_dispatch(&self) -> Vec<InstanceId>;
}

/// Ensures only one `ExecutionQueue` phase in this process calls
/// `try_dispatch` at a time; the others simply wait on the dispatch board.
#[derive(Default)]
pub struct SchedulerElection(AtomicBool);

impl SchedulerElection {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    fn try_elect(&self) -> bool {
        self.0.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
    }

    fn resign(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Shared board the elected scheduler posts dispatch decisions to, so the
/// other in-process waiters can observe them without re-querying the queue.
#[derive(Default)]
pub struct DispatchBoard {
    dispatched: Mutex<HashSet<InstanceId>>,
}

impl DispatchBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dispatched(&self, ids: impl IntoIterator<Item = InstanceId>) {
        self.dispatched.lock().extend(ids);
    }

    pub fn take_if_dispatched(&self, id: &InstanceId) -> bool {
        self.dispatched.lock().remove(id)
    }
}

pub struct ExecutionQueue {
    name: SmolStr,
    instance_id: InstanceId,
    admission: Arc<dyn QueueAdmission>,
    election: Arc<SchedulerElection>,
    board: Arc<DispatchBoard>,
    /// Signalled by the runtime whenever a run ends, so waiters re-check
    /// admission promptly instead of only on the poll tick.
    dispatch_signal: Arc<Notify>,
    poll_interval: Duration,
    state: Mutex<WaiterState>,
    stopped: Arc<AtomicBool>,
}

impl ExecutionQueue {
    pub fn new(
        name: impl Into<SmolStr>,
        instance_id: InstanceId,
        admission: Arc<dyn QueueAdmission>,
        election: Arc<SchedulerElection>,
        board: Arc<DispatchBoard>,
        dispatch_signal: Arc<Notify>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            instance_id,
            admission,
            election,
            board,
            dispatch_signal,
            poll_interval,
            state: Mutex::new(WaiterState::None),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> WaiterState {
        *self.state.lock()
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn board(&self) -> &Arc<DispatchBoard> {
        &self.board
    }
}

#[async_trait]
impl Phase for ExecutionQueue {
    fn metadata(&self) -> PhaseMetadata {
        PhaseMetadata::new(self.name.clone(), RunState::InQueue)
    }

    fn stop_status(&self) -> TerminationStatus {
        TerminationStatus::Cancelled
    }

    async fn run(&self) -> Result<(), PhaseSignal> {
        *self.state.lock() = WaiterState::InQueue;
        loop {
            if self.stopped.load(Ordering::SeqCst) {
                *self.state.lock() = WaiterState::Cancelled;
                return Err(PhaseSignal::Terminate(TerminationStatus::Cancelled));
            }

            if self.board.take_if_dispatched(&self.instance_id) {
                *self.state.lock() = WaiterState::Dispatched;
                return Ok(());
            }

            if self.election.try_elect() {
                let dispatched = self.admission.try_dispatch().await;
                let admitted_self = dispatched.contains(&self.instance_id);
                self.board.mark_dispatched(dispatched);
                self.election.resign();
                if admitted_self {
                    self.board.take_if_dispatched(&self.instance_id);
                    *self.state.lock() = WaiterState::Dispatched;
                    return Ok(());
                }
            }

            tokio::select! {
                _ = self.dispatch_signal.notified() => {}
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
