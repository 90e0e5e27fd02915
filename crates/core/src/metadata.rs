// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instance identity and the parameter maps attached to it.

use crate::ids::{InstanceId, JobId, RunId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `(job_id, run_id, instance_id)` — the identifier triple that names one
/// job instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobInstanceIdTriple {
    pub job_id: JobId,
    pub run_id: RunId,
    pub instance_id: InstanceId,
}

/// Immutable metadata for a job instance.
///
/// `system_parameters` is interpreted by the core itself: coordination
/// phases (e.g. the execution queue) stamp entries here so receivers can
/// recognize queue membership without reaching into phase internals.
/// `user_parameters` is opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInstanceMetadata {
    pub id: JobInstanceIdTriple,
    pub system_parameters: IndexMap<String, String>,
    pub user_parameters: IndexMap<String, String>,
}

impl JobInstanceMetadata {
    pub fn new(job_id: JobId, run_id: RunId, instance_id: InstanceId) -> Self {
        Self {
            id: JobInstanceIdTriple { job_id, run_id, instance_id },
            system_parameters: IndexMap::new(),
            user_parameters: IndexMap::new(),
        }
    }

    pub fn job_id(&self) -> JobId {
        self.id.job_id
    }

    pub fn run_id(&self) -> RunId {
        self.id.run_id
    }

    pub fn instance_id(&self) -> InstanceId {
        self.id.instance_id
    }

    /// True if every pair in `params` appears in either parameter map with
    /// the same value. Used by `InstanceMatchCriteria::matches_parameters`
    /// and by coordination phases recognizing queue/overlap membership.
    pub fn contains_parameters<'a, I>(&self, params: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        params.into_iter().all(|(k, v)| {
            self.system_parameters.get(k).map(String::as_str) == Some(v)
                || self.user_parameters.get(k).map(String::as_str) == Some(v)
        })
    }

    pub fn stamp_system_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.system_parameters.insert(key.into(), value.into());
    }
}

#[cfg(any(test, feature = "test-support"))]
impl JobInstanceMetadata {
    pub fn builder() -> JobInstanceMetadataBuilder {
        JobInstanceMetadataBuilder::default()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub struct JobInstanceMetadataBuilder {
    job_id: JobId,
    run_id: Option<RunId>,
    instance_id: InstanceId,
    system_parameters: IndexMap<String, String>,
    user_parameters: IndexMap<String, String>,
}

#[cfg(any(test, feature = "test-support"))]
impl Default for JobInstanceMetadataBuilder {
    fn default() -> Self {
        Self {
            job_id: JobId::new(),
            run_id: None,
            instance_id: InstanceId::new(),
            system_parameters: IndexMap::new(),
            user_parameters: IndexMap::new(),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl JobInstanceMetadataBuilder {
    pub fn job_id(mut self, job_id: JobId) -> Self {
        self.job_id = job_id;
        self
    }

    pub fn run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    pub fn instance_id(mut self, instance_id: InstanceId) -> Self {
        self.instance_id = instance_id;
        self
    }

    pub fn system_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.system_parameters.insert(key.into(), value.into());
        self
    }

    pub fn user_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_parameters.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> JobInstanceMetadata {
        let run_id = self.run_id.unwrap_or_else(|| RunId::from_string(self.instance_id.as_str().replacen("ist-", "run-", 1)));
        JobInstanceMetadata {
            id: JobInstanceIdTriple { job_id: self.job_id, run_id, instance_id: self.instance_id },
            system_parameters: self.system_parameters,
            user_parameters: self.user_parameters,
        }
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
