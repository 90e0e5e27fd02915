// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job instance runner: binds identity to a Phaser, fans its
//! transitions and captured output out to registered observers, and keeps
//! a bounded in-memory tail buffer for `/jobs/tail`.

use oj_core::{InstanceMatchCriteria, JobInstanceMetadata, JobRun, PhaseMetadata, PhaseRun, RunState, TerminationStatusFlag, TrackingInfo};
use oj_phaser::{Phaser, PhaserError};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Notify;

/// Receives every phase transition for one instance, in order.
pub trait TransitionObserver: Send + Sync {
    fn on_transition(&self, previous: Option<&PhaseRun>, current: &PhaseRun, ordinal: usize);
}

/// Receives every captured output line for one instance, in order.
pub trait OutputObserver: Send + Sync {
    fn on_output(&self, phase: &PhaseMetadata, line: &str, is_error: bool);
}

/// Outcome of `/jobs/_signal/dispatch`: whether a queue waiter was found for
/// this instance and, if so, whether it was actually signalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct DispatchOutcome {
    pub waiter_found: bool,
    pub executed: bool,
}

/// Seam between the API server and whichever coordination phase (if any) is
/// currently blocking an instance. Registered by `ApprovalPhase`,
/// `WaitingPhase`, or `ExecutionQueue` while they run; absent otherwise, in
/// which case every release/dispatch request on this instance is a no-op.
pub trait ReleaseHandle: Send + Sync {
    /// Release the instance if it is currently blocked in `waiting_state`.
    fn release_waiting(&self, waiting_state: RunState) -> bool;
    /// Release the instance if it belongs to `pending_group`.
    fn release_pending(&self, pending_group: &str) -> bool;
    /// Signal an execution-queue waiter to become dispatched.
    fn signal_dispatch(&self) -> DispatchOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Head,
    Tail,
}

struct OutputLine {
    phase: String,
    text: String,
    is_error: bool,
}

struct OutputBuffer {
    capacity: usize,
    lines: VecDeque<OutputLine>,
}

impl OutputBuffer {
    fn new(capacity: usize) -> Self {
        Self { capacity, lines: VecDeque::with_capacity(capacity.min(1024)) }
    }

    fn push(&mut self, phase: &str, text: String, is_error: bool) {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(OutputLine { phase: phase.to_string(), text, is_error });
    }

    fn fetch(&self, mode: FetchMode, n: usize) -> Vec<(String, bool)> {
        match mode {
            FetchMode::Tail => self.lines.iter().rev().take(n).rev().map(|l| (l.text.clone(), l.is_error)).collect(),
            FetchMode::Head => self.lines.iter().take(n).map(|l| (l.text.clone(), l.is_error)).collect(),
        }
    }
}

struct Inner {
    metadata: JobInstanceMetadata,
    phaser: Arc<Phaser>,
    output: Mutex<OutputBuffer>,
    transition_observers: Mutex<Vec<(i32, Arc<dyn TransitionObserver>)>>,
    output_observers: Mutex<Vec<(i32, Arc<dyn OutputObserver>)>>,
    release_handle: Mutex<Option<Arc<dyn ReleaseHandle>>>,
}

/// One job instance: identity plus a driven Phaser plus observer fan-out.
#[derive(Clone)]
pub struct JobInstanceRunner(Arc<Inner>);

impl JobInstanceRunner {
    pub fn new(metadata: JobInstanceMetadata, phaser: Arc<Phaser>, output_buffer_lines: usize) -> Self {
        let inner = Arc::new(Inner {
            metadata,
            phaser: phaser.clone(),
            output: Mutex::new(OutputBuffer::new(output_buffer_lines)),
            transition_observers: Mutex::new(Vec::new()),
            output_observers: Mutex::new(Vec::new()),
            release_handle: Mutex::new(None),
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        phaser.set_transition_hook(Arc::new(move |previous, current, ordinal| {
            if let Some(inner) = weak.upgrade() {
                notify_transition(&inner, previous, current, ordinal);
            }
        }));

        Self(inner)
    }

    pub fn metadata(&self) -> &JobInstanceMetadata {
        &self.0.metadata
    }

    pub fn phaser(&self) -> &Arc<Phaser> {
        &self.0.phaser
    }

    /// Prime and run the underlying Phaser to completion.
    pub async fn run(&self) -> Result<(), PhaserError> {
        self.0.phaser.prime()?;
        self.0.phaser.run().await
    }

    pub fn job_run_info(&self) -> JobRun {
        let mut run = JobRun::new(self.0.metadata.clone(), self.0.phaser.create_run_snapshot());
        run.task = Some(TrackingInfo::default());
        run
    }

    /// Register a transition observer. When `notify_on_register` is set, the
    /// observer is handed the current run under the transition lock before
    /// being added, so it can't miss the transition that is in progress.
    pub fn add_observer_phase_transition(&self, observer: Arc<dyn TransitionObserver>, priority: i32, notify_on_register: bool) {
        if notify_on_register {
            let observer = observer.clone();
            self.0.phaser.execute_transition_hook_safely(|previous, current, ordinal| {
                observer.on_transition(previous, current, ordinal);
            });
        }
        let mut observers = self.0.transition_observers.lock();
        observers.push((priority, observer));
        observers.sort_by_key(|(priority, _)| *priority);
    }

    pub fn add_observer_output(&self, observer: Arc<dyn OutputObserver>, priority: i32) {
        let mut observers = self.0.output_observers.lock();
        observers.push((priority, observer));
        observers.sort_by_key(|(priority, _)| *priority);
    }

    /// Called by a phase body (e.g. the program-execution phase) for each
    /// captured output line.
    pub fn record_output(&self, phase: &PhaseMetadata, line: &str, is_error: bool) {
        self.0.output.lock().push(&phase.name, line.to_string(), is_error);
        let snapshot = self.0.output_observers.lock().clone();
        for (_, observer) in &snapshot {
            observer.on_output(phase, line, is_error);
        }
    }

    pub fn fetch_output(&self, mode: FetchMode, lines: usize) -> Vec<(String, bool)> {
        self.0.output.lock().fetch(mode, lines)
    }

    pub fn stop(&self) {
        self.0.phaser.stop();
    }

    pub fn interrupted(&self) -> bool {
        matches!(
            self.0.phaser.create_run_snapshot().termination.map(|t| t.status),
            Some(oj_core::TerminationStatus::Interrupted)
        )
    }

    /// Set (or clear) the coordination phase currently willing to release
    /// this instance early. A new registration replaces any previous one.
    pub fn set_release_handle(&self, handle: Option<Arc<dyn ReleaseHandle>>) {
        *self.0.release_handle.lock() = handle;
    }

    pub fn release_waiting(&self, waiting_state: RunState) -> bool {
        self.0.release_handle.lock().as_ref().map(|h| h.release_waiting(waiting_state)).unwrap_or(false)
    }

    pub fn release_pending(&self, pending_group: &str) -> bool {
        self.0.release_handle.lock().as_ref().map(|h| h.release_pending(pending_group)).unwrap_or(false)
    }

    pub fn signal_dispatch(&self) -> DispatchOutcome {
        self.0.release_handle.lock().as_ref().map(|h| h.signal_dispatch()).unwrap_or_default()
    }

    /// Name of the phase currently running, as recorded on the lifecycle.
    pub fn current_phase_name(&self) -> String {
        self.job_run_info().run.lifecycle.current().map(|r| r.phase_name.to_string()).unwrap_or_default()
    }

    /// Run state of the phase currently running.
    pub fn current_run_state(&self) -> RunState {
        self.job_run_info().run.lifecycle.current().map(|r| r.run_state).unwrap_or(RunState::None)
    }

    /// Flags of the current termination status, or `NONE` while still running.
    pub fn termination_flags(&self) -> TerminationStatusFlag {
        self.job_run_info().run.termination.map(|t| t.status.flags()).unwrap_or(TerminationStatusFlag::NONE)
    }

    /// No warning concept exists yet; every instance reports no warning.
    fn has_warning(&self) -> bool {
        false
    }

    /// Evaluate `criteria` against this instance's current id, lifecycle,
    /// phase, termination flags, and parameters.
    pub fn matches(&self, criteria: &InstanceMatchCriteria) -> bool {
        let info = self.job_run_info();
        let phase = self.current_phase_name();
        criteria.matches(&info.metadata, &info.run.lifecycle, &phase, self.termination_flags(), self.has_warning())
    }

    /// Block until the lifecycle enters a run matching `phase_name` (if
    /// given) and `run_state`, or `timeout` elapses. Returns whether a
    /// matching run was observed.
    pub async fn wait_for_transition(&self, phase_name: Option<&str>, run_state: RunState, timeout: Option<Duration>) -> bool {
        struct Waiter {
            phase_name: Option<String>,
            run_state: RunState,
            notify: Arc<Notify>,
            matched: Mutex<bool>,
        }
        impl TransitionObserver for Waiter {
            fn on_transition(&self, _previous: Option<&PhaseRun>, current: &PhaseRun, _ordinal: usize) {
                let matches = current.run_state == self.run_state
                    && self.phase_name.as_deref().map(|name| current.phase_name.as_str() == name).unwrap_or(true);
                if matches {
                    *self.matched.lock() = true;
                    self.notify.notify_waiters();
                }
            }
        }

        let waiter = Arc::new(Waiter {
            phase_name: phase_name.map(str::to_owned),
            run_state,
            notify: Arc::new(Notify::new()),
            matched: Mutex::new(false),
        });
        self.add_observer_phase_transition(waiter.clone(), i32::MAX, true);

        if *waiter.matched.lock() {
            return true;
        }
        let notified = waiter.notify.notified();
        match timeout {
            Some(timeout) => tokio::time::timeout(timeout, notified).await.is_ok(),
            None => {
                notified.await;
                true
            }
        }
    }
}

fn notify_transition(inner: &Inner, previous: Option<&PhaseRun>, current: &PhaseRun, ordinal: usize) {
    tracing::info!(
        instance_id = %inner.metadata.instance_id(),
        phase = %current.phase_name,
        run_state = %current.run_state,
        "event=[phase_transition]"
    );
    let observers = inner.transition_observers.lock().clone();
    for (_, observer) in &observers {
        observer.on_transition(previous, current, ordinal);
    }
}

/// The set of instances live in this process, as seen by the API server
/// and the event dispatchers. Instances are added on creation and removed
/// once their lifecycle has ended.
#[derive(Default)]
pub struct InstanceRegistry {
    instances: RwLock<Vec<JobInstanceRunner>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, runner: JobInstanceRunner) {
        self.instances.write().push(runner);
    }

    pub fn remove(&self, instance_id: oj_core::InstanceId) {
        self.instances.write().retain(|r| r.metadata().instance_id() != instance_id);
    }

    pub fn all(&self) -> Vec<JobInstanceRunner> {
        self.instances.read().clone()
    }

    pub fn matching(&self, criteria: &InstanceMatchCriteria) -> Vec<JobInstanceRunner> {
        self.instances.read().iter().filter(|r| r.matches(criteria)).cloned().collect()
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
