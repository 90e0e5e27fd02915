// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence collaborator interface.
//!
//! The core never persists anything itself: a phase-transition observer
//! drives a `JobHistory` implementation on each transition whose new phase
//! has `run_state = ENDED`. Concrete backends (SQLite, etc.) are out of
//! scope here — this module only fixes the interface they must implement.

use crate::criteria::InstanceMatchCriteria;
use crate::job_run::JobRun;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Which timestamp `read` should order results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortCriterion {
    Created,
    Ended,
    Time,
}

/// Aggregate counts for a set of matching job runs, grouped by job id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub job_id: SmolStr,
    pub count: u64,
    pub first_created: Option<chrono::DateTime<chrono::Utc>>,
    pub last_ended: Option<chrono::DateTime<chrono::Utc>>,
}

#[async_trait]
pub trait JobHistory: Send + Sync {
    async fn store(&self, job_run: &JobRun) -> Result<(), PersistenceError>;

    #[allow(clippy::too_many_arguments)]
    async fn read(
        &self,
        criteria: &InstanceMatchCriteria,
        sort: SortCriterion,
        ascending: bool,
        limit: Option<usize>,
        offset: usize,
        last: bool,
    ) -> Result<Vec<JobRun>, PersistenceError>;

    async fn stats(&self, criteria: &InstanceMatchCriteria) -> Result<Vec<JobStats>, PersistenceError>;

    async fn clean(&self, max_records: Option<usize>, max_age: Option<chrono::Duration>) -> Result<(), PersistenceError>;

    async fn remove(&self, criteria: &InstanceMatchCriteria) -> Result<u64, PersistenceError>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::*;
    use parking_lot::Mutex;

    /// In-memory `JobHistory` used by coordination/runner tests that need a
    /// real collaborator without a database.
    #[derive(Default)]
    pub struct InMemoryJobHistory {
        runs: Mutex<Vec<JobRun>>,
    }

    #[async_trait]
    impl JobHistory for InMemoryJobHistory {
        async fn store(&self, job_run: &JobRun) -> Result<(), PersistenceError> {
            self.runs.lock().push(job_run.clone());
            Ok(())
        }

        async fn read(
            &self,
            _criteria: &InstanceMatchCriteria,
            _sort: SortCriterion,
            _ascending: bool,
            limit: Option<usize>,
            offset: usize,
            _last: bool,
        ) -> Result<Vec<JobRun>, PersistenceError> {
            let runs = self.runs.lock();
            Ok(runs.iter().skip(offset).take(limit.unwrap_or(usize::MAX)).cloned().collect())
        }

        async fn stats(&self, _criteria: &InstanceMatchCriteria) -> Result<Vec<JobStats>, PersistenceError> {
            Ok(Vec::new())
        }

        async fn clean(&self, max_records: Option<usize>, _max_age: Option<chrono::Duration>) -> Result<(), PersistenceError> {
            if let Some(max) = max_records {
                let mut runs = self.runs.lock();
                if runs.len() > max {
                    let overflow = runs.len() - max;
                    runs.drain(0..overflow);
                }
            }
            Ok(())
        }

        async fn remove(&self, _criteria: &InstanceMatchCriteria) -> Result<u64, PersistenceError> {
            let mut runs = self.runs.lock();
            let removed = runs.len() as u64;
            runs.clear();
            Ok(removed)
        }
    }
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
