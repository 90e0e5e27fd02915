// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn approve_before_run_completes_immediately() {
    let phase = ApprovalPhase::new("approval", Duration::from_secs(10));
    phase.approve();
    phase.run().await.unwrap();
}

#[tokio::test]
async fn approve_while_waiting_unblocks_run() {
    let phase = Arc::new(ApprovalPhase::new("approval", Duration::from_secs(10)));
    let runner = phase.clone();
    let handle = tokio::spawn(async move { runner.run().await });
    tokio::time::sleep(Duration::from_millis(5)).await;
    phase.approve();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn timeout_elapses_without_approval() {
    let phase = ApprovalPhase::new("approval", Duration::from_millis(5));
    let err = phase.run().await.unwrap_err();
    assert_eq!(err, PhaseSignal::Terminate(TerminationStatus::Timeout));
}

#[tokio::test]
async fn stop_cancels_a_pending_approval() {
    let phase = Arc::new(ApprovalPhase::new("approval", Duration::from_secs(10)));
    let runner = phase.clone();
    let handle = tokio::spawn(async move { runner.run().await });
    tokio::time::sleep(Duration::from_millis(5)).await;
    phase.stop();
    let err = handle.await.unwrap().unwrap_err();
    assert_eq!(err, PhaseSignal::Terminate(TerminationStatus::Cancelled));
}
