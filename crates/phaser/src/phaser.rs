// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Phaser: drives an ordered list of phases, recording the lifecycle
//! and classifying each phase's outcome into a `TerminationInfo`.

use crate::phase::{PhaseRef, PhaseSignal};
use crate::standard_phases::{init_phase, terminal_phase};
use oj_core::clock::BoxClock;
use oj_core::lifecycle::standard_phase_names;
use oj_core::{Fault, Lifecycle, LifecycleError, PhaseMetadata, PhaseRun, RunSnapshot, TerminationInfo, TerminationStatus};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::sync::Arc;

/// Error returned by [`Phaser::run`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhaserError {
    /// `run()` was called before `prime()`.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// The run ended with `TerminationStatus::Interrupted`; callers are
    /// expected to re-propagate this the way they would re-raise a caught
    /// interrupt signal.
    #[error("run interrupted")]
    Interrupted,
}

type TransitionHook = dyn Fn(Option<&PhaseRun>, &PhaseRun, usize) + Send + Sync;

struct PhaserState {
    lifecycle: Lifecycle,
    /// `None` before `prime()`, `Some(0)` while in `INIT`, `Some(i)` while in
    /// user phase `i - 1`, `Some(phases.len() + 1)` while in `TERMINAL`.
    current_index: Option<usize>,
    termination: Option<TerminationInfo>,
    abort: bool,
}

/// Drives `phases` in declared order between a synthetic `INIT` and a
/// synthetic `TERMINAL` phase.
pub struct Phaser {
    phases: Vec<PhaseRef>,
    clock: BoxClock,
    state: ReentrantMutex<RefCell<PhaserState>>,
    transition_hook: ReentrantMutex<RefCell<Option<Arc<TransitionHook>>>>,
}

impl Phaser {
    pub fn new(phases: Vec<PhaseRef>, clock: BoxClock) -> Result<Self, LifecycleError> {
        let mut seen = std::collections::HashSet::new();
        for phase in &phases {
            if !seen.insert(phase.metadata().name) {
                return Err(LifecycleError::DuplicatePhaseName(phase.metadata().name.to_string()));
            }
        }
        Ok(Self {
            phases,
            clock,
            state: ReentrantMutex::new(RefCell::new(PhaserState {
                lifecycle: Lifecycle::new(),
                current_index: None,
                termination: None,
                abort: false,
            })),
            transition_hook: ReentrantMutex::new(RefCell::new(None)),
        })
    }

    /// Register the transition hook `(previous_run, current_run, ordinal)`.
    /// Replaces any previously registered hook.
    pub fn set_transition_hook(&self, hook: Arc<TransitionHook>) {
        let guard = self.transition_hook.lock();
        *guard.borrow_mut() = Some(hook);
    }

    fn call_transition_hook(&self, previous: Option<&PhaseRun>, current: &PhaseRun, ordinal: usize) {
        let guard = self.transition_hook.lock();
        if let Some(hook) = guard.borrow().as_ref() {
            hook(previous, current, ordinal);
        }
    }

    /// Advance to the synthetic `INIT` phase. Must be called exactly once,
    /// before [`Self::run`].
    pub fn prime(&self) -> Result<(), LifecycleError> {
        let guard = self.state.lock();
        let mut st = guard.borrow_mut();
        if st.current_index.is_some() {
            return Err(LifecycleError::AlreadyPrimed);
        }
        let run = PhaseRun::new(standard_phase_names::INIT, init_phase().metadata().run_state, self.clock.now());
        st.lifecycle.add_phase_run(run.clone());
        st.current_index = Some(0);
        drop(st);
        self.call_transition_hook(None, &run, 0);
        Ok(())
    }

    /// Run every phase in order, outside the transition lock, classifying
    /// each one's outcome and recording it on the lifecycle.
    pub async fn run(&self) -> Result<(), PhaserError> {
        loop {
            let next = {
                let guard = self.state.lock();
                let mut st = guard.borrow_mut();
                if st.current_index.is_none() {
                    return Err(LifecycleError::NotPrimed.into());
                }
                if st.abort {
                    self.enter_terminal(&mut st);
                    return self.finish_if_interrupted(&st);
                }
                if st.termination.is_some() {
                    self.enter_terminal(&mut st);
                    return self.finish_if_interrupted(&st);
                }
                self.advance_to_next_phase(&mut st)
            };

            let Some((phase, ordinal)) = next else {
                // Fell through the user phase list with no termination set:
                // treat as a clean completion.
                let guard = self.state.lock();
                let mut st = guard.borrow_mut();
                st.termination = Some(TerminationInfo::new(TerminationStatus::Completed, self.clock.now()));
                self.enter_terminal(&mut st);
                return self.finish_if_interrupted(&st);
            };

            let outcome = self.run_phase_body(phase).await;
            let guard = self.state.lock();
            let mut st = guard.borrow_mut();
            // stop() may have already recorded a termination while this
            // phase body was running; don't clobber it with a second one.
            if st.termination.is_none() {
                st.termination = Some(self.classify(outcome, ordinal));
            }
        }
    }

    fn advance_to_next_phase(&self, st: &mut PhaserState) -> Option<(PhaseRef, usize)> {
        let current = st.current_index.expect("checked by caller");
        if current >= self.phases.len() {
            return None;
        }
        let phase = self.phases[current].clone();
        let meta = phase.metadata();
        let run = PhaseRun::new(meta.name.clone(), meta.run_state, self.clock.now());
        st.lifecycle.add_phase_run(run.clone());
        st.current_index = Some(current + 1);
        let ordinal = current + 1;
        self.call_transition_hook(st.lifecycle.previous(), &run, ordinal);
        Some((phase, current))
    }

    async fn run_phase_body(&self, phase: PhaseRef) -> Result<(), PhaseSignal> {
        let handle = tokio::spawn(async move { phase.run().await });
        match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                let message = panic_message(join_err.into_panic());
                Err(PhaseSignal::Error(Fault::new("PhasePanic", message)))
            }
            Err(join_err) => Err(PhaseSignal::Error(Fault::new("PhaseCancelled", join_err.to_string()))),
        }
    }

    fn classify(&self, outcome: Result<(), PhaseSignal>, _ordinal: usize) -> TerminationInfo {
        let now = self.clock.now();
        match outcome {
            Ok(()) => TerminationInfo::new(TerminationStatus::Completed, now),
            Err(PhaseSignal::Terminate(status)) => TerminationInfo::new(status, now),
            Err(PhaseSignal::Failed(fault)) => TerminationInfo::with_failure(TerminationStatus::Failed, now, fault),
            Err(PhaseSignal::Error(fault)) => TerminationInfo::with_error(TerminationStatus::Error, now, fault),
        }
    }

    fn enter_terminal(&self, st: &mut PhaserState) {
        if st.current_index == Some(self.phases.len() + 1) {
            return; // already terminal
        }
        let run = PhaseRun::new(standard_phase_names::TERMINAL, terminal_phase().metadata().run_state, self.clock.now());
        st.lifecycle.add_phase_run(run.clone());
        st.current_index = Some(self.phases.len() + 1);
        let ordinal = self.phases.len() + 1;
        self.call_transition_hook(st.lifecycle.previous(), &run, ordinal);
    }

    fn finish_if_interrupted(&self, st: &PhaserState) -> Result<(), PhaserError> {
        match st.termination.as_ref().map(|t| t.status) {
            Some(TerminationStatus::Interrupted) => Err(PhaserError::Interrupted),
            _ => Ok(()),
        }
    }

    /// Non-blocking, idempotent request to end the run early.
    pub fn stop(&self) {
        let guard = self.state.lock();
        let mut st = guard.borrow_mut();
        if st.termination.is_some() {
            return;
        }
        let status = match st.current_index {
            Some(0) => {
                st.abort = true;
                init_phase().stop_status()
            }
            Some(i) if i >= 1 && i <= self.phases.len() => self.phases[i - 1].stop_status(),
            _ => TerminationStatus::Cancelled,
        };
        st.termination = Some(TerminationInfo::new(status, self.clock.now()));
        let current_phase_index = st.current_index;
        drop(st);
        if let Some(i) = current_phase_index {
            if i >= 1 && i <= self.phases.len() {
                self.phases[i - 1].stop();
            }
        }
    }

    /// Atomic snapshot of phase metadata, lifecycle, and termination info.
    pub fn create_run_snapshot(&self) -> RunSnapshot {
        let guard = self.state.lock();
        let st = guard.borrow();
        let mut phases: Vec<PhaseMetadata> = vec![init_phase().metadata()];
        phases.extend(self.phases.iter().map(|p| p.metadata()));
        phases.push(terminal_phase().metadata());
        RunSnapshot::new(phases, st.lifecycle.clone(), st.termination.clone())
    }

    /// Run `f(previous_run, current_run, ordinal)` under the transition
    /// lock, delivering the current state atomically — used to register an
    /// observer without racing a concurrent transition.
    pub fn execute_transition_hook_safely(&self, f: impl FnOnce(Option<&PhaseRun>, &PhaseRun, usize)) {
        let guard = self.state.lock();
        let st = guard.borrow();
        if let Some(current) = st.lifecycle.current() {
            let ordinal = st.current_index.unwrap_or(0);
            f(st.lifecycle.previous(), current, ordinal);
        }
    }

    pub fn is_ended(&self) -> bool {
        let guard = self.state.lock();
        guard.borrow().lifecycle.is_ended()
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "phase body panicked".to_string()
    }
}

#[cfg(test)]
#[path = "phaser_tests.rs"]
mod tests;
