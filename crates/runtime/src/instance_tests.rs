// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use oj_core::clock::{BoxClock, FakeClock};
use oj_core::{InstanceId, JobId, RunId};
use oj_phaser::phase::{Phase, PhaseSignal};
use std::sync::atomic::{AtomicUsize, Ordering};

struct CountingPhase {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Phase for CountingPhase {
    fn metadata(&self) -> PhaseMetadata {
        PhaseMetadata::new("work", RunState::Executing)
    }

    async fn run(&self) -> Result<(), PhaseSignal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {}
}

fn clock() -> BoxClock {
    Arc::new(FakeClock::new())
}

fn metadata() -> JobInstanceMetadata {
    JobInstanceMetadata::new(JobId::new(), RunId::new(), InstanceId::new())
}

#[tokio::test]
async fn running_the_instance_completes_and_exposes_job_run_info() {
    let calls = Arc::new(AtomicUsize::new(0));
    let phaser = Arc::new(Phaser::new(vec![Arc::new(CountingPhase { calls: calls.clone() })], clock()).unwrap());
    let runner = JobInstanceRunner::new(metadata(), phaser, 10);

    runner.run().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let info = runner.job_run_info();
    assert_eq!(info.run.termination.unwrap().status, oj_core::TerminationStatus::Completed);
}

#[tokio::test]
async fn transition_observers_see_every_phase_change_in_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let phaser = Arc::new(Phaser::new(vec![Arc::new(CountingPhase { calls })], clock()).unwrap());
    let runner = JobInstanceRunner::new(metadata(), phaser, 10);

    struct Recorder(Mutex<Vec<String>>);
    impl TransitionObserver for Recorder {
        fn on_transition(&self, _previous: Option<&PhaseRun>, current: &PhaseRun, _ordinal: usize) {
            self.0.lock().push(current.phase_name.to_string());
        }
    }
    let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
    runner.add_observer_phase_transition(recorder.clone(), 0, false);

    runner.run().await.unwrap();

    assert_eq!(*recorder.0.lock(), vec!["INIT", "work", "TERMINAL"]);
}

#[tokio::test]
async fn output_is_buffered_and_fanned_out_to_observers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let phaser = Arc::new(Phaser::new(vec![Arc::new(CountingPhase { calls })], clock()).unwrap());
    let runner = JobInstanceRunner::new(metadata(), phaser, 2);

    struct Recorder(Mutex<Vec<String>>);
    impl OutputObserver for Recorder {
        fn on_output(&self, _phase: &PhaseMetadata, line: &str, _is_error: bool) {
            self.0.lock().push(line.to_string());
        }
    }
    let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
    runner.add_observer_output(recorder.clone(), 0);

    let phase = PhaseMetadata::new("work", RunState::Executing);
    runner.record_output(&phase, "one", false);
    runner.record_output(&phase, "two", false);
    runner.record_output(&phase, "three", false);

    assert_eq!(*recorder.0.lock(), vec!["one", "two", "three"]);
    // capacity 2: the oldest line was evicted from the tail buffer.
    assert_eq!(runner.fetch_output(FetchMode::Tail, 10), vec![("two".to_string(), false), ("three".to_string(), false)]);
}

#[tokio::test]
async fn wait_for_transition_resolves_once_the_target_state_is_reached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let phaser = Arc::new(Phaser::new(vec![Arc::new(CountingPhase { calls })], clock()).unwrap());
    let runner = JobInstanceRunner::new(metadata(), phaser, 10);

    let waiter_runner = runner.clone();
    let waiter = tokio::spawn(async move { waiter_runner.wait_for_transition(None, RunState::Ended, Some(Duration::from_secs(1))).await });

    runner.run().await.unwrap();
    assert!(waiter.await.unwrap());
}

#[tokio::test]
async fn wait_for_transition_times_out_when_never_reached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let phaser = Arc::new(Phaser::new(vec![Arc::new(CountingPhase { calls })], clock()).unwrap());
    let runner = JobInstanceRunner::new(metadata(), phaser, 10);

    let resolved = runner.wait_for_transition(Some("never-entered"), RunState::Executing, Some(Duration::from_millis(20))).await;
    assert!(!resolved);
}
