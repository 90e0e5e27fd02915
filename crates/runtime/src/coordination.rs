// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-process collaborators for the Phaser's coordination phases:
//! `OverlapGuard`, `DependencyCheck`, and `QueueAdmission` all query the
//! namespace's other processes through [`JobsClient`](crate::client::JobsClient),
//! guarded by the [`HostLock`](crate::host_lock::HostLock) for the
//! inspect-then-decide window.

use crate::host_lock::HostLock;
use crate::instance::InstanceRegistry;
use oj_core::{IdCriterion, InstanceId, InstanceMatchCriteria, JobId, JobRun, MatchingStrategy, RunState, TerminationStatusFlag};
use oj_phaser::dependency::DependencyCheck;
use oj_phaser::no_overlap::OverlapGuard;
use oj_phaser::queue::QueueAdmission;
use oj_phaser::waiting::{ConditionResult, ObservableCondition};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::client::JobsClient;

fn job_run_of(body: &serde_json::Value) -> Option<JobRun> {
    serde_json::from_value(body.clone()).ok()
}

fn has_ended(run: &JobRun) -> bool {
    run.run.termination.as_ref().is_some_and(|t| t.status.flags().contains(TerminationStatusFlag::EXECUTED))
}

/// Admits an instance into a protected window only if no other instance of
/// the same job is currently registered anywhere in the socket namespace.
/// The host lock serializes the inspect-then-claim sequence across every
/// process sharing it; the instance itself is visible to other processes
/// the moment its `JobInstanceRunner` is inserted into its process's
/// `InstanceRegistry`, so "no other instance registered" is the claim.
pub struct RuntimeOverlapGuard {
    host_lock: HostLock,
    client: Arc<JobsClient>,
    lock_timeout: Duration,
}

impl RuntimeOverlapGuard {
    pub fn new(host_lock: HostLock, client: Arc<JobsClient>, lock_timeout: Duration) -> Self {
        Self { host_lock, client, lock_timeout }
    }
}

#[async_trait]
impl OverlapGuard for RuntimeOverlapGuard {
    async fn try_enter(&self, job_id: &JobId, instance_id: &InstanceId) -> bool {
        let Ok(_guard) = self.host_lock.acquire(self.lock_timeout).await else {
            return false;
        };
        let criteria = InstanceMatchCriteria { job_ids: vec![job_id.as_str().into()], ..Default::default() };
        let (instances, _errors) = self.client.read_instances(Some(criteria)).await;
        !instances.iter().any(|(metadata, _)| metadata.instance_id() != *instance_id)
    }

    async fn exit(&self, _job_id: &JobId, _instance_id: &InstanceId) {}
}

/// Satisfied once every remote instance matching `criteria` has ended with
/// the `EXECUTED` flag, or none match at all (the dependency's run already
/// left the namespace).
pub struct RemoteDependencyCheck {
    client: Arc<JobsClient>,
    criteria: InstanceMatchCriteria,
}

impl RemoteDependencyCheck {
    pub fn new(client: Arc<JobsClient>, criteria: InstanceMatchCriteria) -> Self {
        Self { client, criteria }
    }
}

#[async_trait]
impl DependencyCheck for RemoteDependencyCheck {
    async fn is_satisfied(&self) -> bool {
        let (instances, _errors) = self.client.read_instances(Some(self.criteria.clone())).await;
        instances.iter().all(|(_, body)| job_run_of(body).as_ref().is_some_and(has_ended))
    }
}

/// Satisfied once every remote instance matching `criteria` is currently in
/// `phase_name`. Polled the same way [`RemoteDependencyCheck`] is, rather
/// than subscribing to the transition event fabric, so both coordination
/// collaborators share one cheap mental model.
pub struct PhaseReachedCondition {
    client: Arc<JobsClient>,
    criteria: InstanceMatchCriteria,
    phase_name: String,
}

impl PhaseReachedCondition {
    pub fn new(client: Arc<JobsClient>, criteria: InstanceMatchCriteria, phase_name: impl Into<String>) -> Self {
        Self { client, criteria, phase_name: phase_name.into() }
    }
}

#[async_trait]
impl ObservableCondition for PhaseReachedCondition {
    async fn evaluate(&self) -> ConditionResult {
        let (instances, errors) = self.client.read_instances(Some(self.criteria.clone())).await;
        if instances.is_empty() && !errors.is_empty() {
            return ConditionResult::EvaluationError;
        }
        let reached = instances.iter().all(|(_, body)| {
            job_run_of(body)
                .and_then(|run| run.run.lifecycle.current().map(|r| r.phase_name.to_string()))
                .is_some_and(|name| name == self.phase_name)
        });
        if reached {
            ConditionResult::Satisfied
        } else {
            ConditionResult::Unsatisfied
        }
    }
}

/// Admits waiters up to `max_executions` concurrently-`EXECUTING` members of
/// `execution_group`, oldest queued first, counting and signalling across
/// every process sharing the socket namespace rather than just this one.
/// Candidates already registered in this process are handed back directly
/// (the caller marks them on its own `DispatchBoard`); candidates owned by
/// another process are admitted by sending that process a targeted
/// `/jobs/_signal/dispatch` request and only counted once its response
/// confirms the waiter actually moved to `Dispatched`.
pub struct RuntimeQueueAdmission {
    registry: Arc<InstanceRegistry>,
    client: Arc<JobsClient>,
    host_lock: HostLock,
    lock_timeout: Duration,
    execution_group: String,
    max_executions: usize,
}

impl RuntimeQueueAdmission {
    pub fn new(
        registry: Arc<InstanceRegistry>,
        client: Arc<JobsClient>,
        host_lock: HostLock,
        lock_timeout: Duration,
        execution_group: String,
        max_executions: usize,
    ) -> Self {
        Self { registry, client, host_lock, lock_timeout, execution_group, max_executions }
    }

    fn instance_criteria(instance_id: &InstanceId) -> InstanceMatchCriteria {
        InstanceMatchCriteria {
            id_criteria: vec![IdCriterion::new("", instance_id.as_str(), true, MatchingStrategy::Exact)],
            ..Default::default()
        }
    }
}

#[async_trait]
impl QueueAdmission for RuntimeQueueAdmission {
    async fn try_dispatch(&self) -> Vec<InstanceId> {
        let Ok(_guard) = self.host_lock.acquire(self.lock_timeout).await else {
            return Vec::new();
        };

        let criteria = InstanceMatchCriteria { param_sets: vec![vec![("execution_group".to_string(), self.execution_group.clone())]], ..Default::default() };
        let (instances, _errors) = self.client.read_instances(Some(criteria)).await;

        let mut executing = 0usize;
        let mut queued: Vec<(InstanceId, DateTime<Utc>)> = Vec::new();
        for (metadata, body) in &instances {
            let Some(run) = job_run_of(body) else { continue };
            match run.run.lifecycle.current().map(|r| r.run_state) {
                Some(RunState::Executing) => executing += 1,
                Some(RunState::InQueue) => queued.push((metadata.instance_id(), run.run.lifecycle.created_at().unwrap_or_default())),
                _ => {}
            }
        }
        let mut remaining = self.max_executions.saturating_sub(executing);
        if remaining == 0 {
            return Vec::new();
        }
        queued.sort_by_key(|(_, created_at)| *created_at);

        let local_ids: HashSet<InstanceId> = self.registry.all().into_iter().map(|r| r.metadata().instance_id()).collect();
        let mut dispatched = Vec::new();
        for (instance_id, _) in queued {
            if remaining == 0 {
                break;
            }
            if local_ids.contains(&instance_id) {
                dispatched.push(instance_id);
                remaining -= 1;
                continue;
            }
            let (responses, _errors) = self.client.signal_dispatch(Self::instance_criteria(&instance_id)).await;
            if responses.iter().any(|(_, body)| body.executed) {
                remaining -= 1;
            }
        }
        dispatched
    }
}

#[cfg(test)]
#[path = "coordination_tests.rs"]
mod tests;
